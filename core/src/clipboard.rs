//! Clipboard access for copying result markup

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long the "Copied!" confirmation stays visible
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Sets the system clipboard through the terminal's OSC 52 sequence
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Escape sequence that puts `text` on the clipboard
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&self, text: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| crate::error::Error::Generic("clipboard writer poisoned".to_string()))?;
        out.write_all(Self::sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps the last copied text in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn content(&self) -> Option<String> {
        self.content.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        if let Ok(mut content) = self.content.lock() {
            *content = Some(text.to_string());
        }
        Ok(())
    }
}

/// Transient confirmation shown after a copy
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyNotice {
    copied_at: Option<Instant>,
}

impl CopyNotice {
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_CONFIRMATION)
            .unwrap_or(false)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_visible(now) {
            "Copied!"
        } else {
            "Copy"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        let clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy("\\frac{x^3}{3}").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, "\x1b]52;c;XGZyYWN7eF4zfXszfQ==\x07");
    }

    #[test]
    fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.content(), None);
        clipboard.copy("x").unwrap();
        assert_eq!(clipboard.content().as_deref(), Some("x"));
    }

    #[test]
    fn test_copy_notice_expires() {
        let start = Instant::now();
        let mut notice = CopyNotice::default();
        assert_eq!(notice.label(start), "Copy");

        notice.mark(start);
        assert_eq!(notice.label(start + Duration::from_millis(1500)), "Copied!");
        assert_eq!(notice.label(start + Duration::from_secs(2)), "Copy");
    }
}
