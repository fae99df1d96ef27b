//! Text processing utilities for interactive mode
//!
//! Unicode-aware width calculation and wrapping for the result and
//! history panels. Math output is full of superscripts and symbols, so
//! widths are always measured in terminal cells rather than bytes.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap text to fit within specified width, breaking at word boundaries
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if text_width(line) <= max_width {
            lines.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0;

        for word in line.split_whitespace() {
            let word_width = text_width(word);

            if word_width > max_width {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }

                // Long formulas have no spaces to break at
                for ch in word.chars() {
                    let ch_width = char_width(ch);
                    if current_width + ch_width > max_width && !current_line.is_empty() {
                        lines.push(std::mem::take(&mut current_line));
                        current_width = 0;
                    }
                    current_line.push(ch);
                    current_width += ch_width;
                }
            } else if current_width > 0 && current_width + 1 + word_width > max_width {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
                current_width = word_width;
            } else {
                if current_width > 0 {
                    current_line.push(' ');
                    current_width += 1;
                }
                current_line.push_str(word);
                current_width += word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Cut text to at most `max_width` cells, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}


/// Calculate the display width of text considering Unicode characters
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Calculate the display width of a single character
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_simple() {
        let wrapped = wrap_text("1. Power rule", 20);
        assert_eq!(wrapped, vec!["1. Power rule"]);
    }

    #[test]
    fn test_wrap_text_long_line() {
        let text = "Apply the substitution u = x² and integrate the result term by term";
        let wrapped = wrap_text(text, 20);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(text_width(line) <= 20);
        }
    }

    #[test]
    fn test_wrap_text_formula_without_spaces() {
        let text = "sin(x)·cos(x)+x³/3+eˣ·ln(x)";
        let wrapped = wrap_text(text, 8);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(text_width(line) <= 8);
        }
        assert_eq!(wrapped.concat(), text);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("∫ x² dx", 20), "∫ x² dx");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
