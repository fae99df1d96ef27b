//! Pending request status line
//!
//! Shows a spinner and the elapsed time while a calculation is out. The
//! line keeps its own state so ticking it does not redraw the whole app.

use crate::interactive::message_handler::AppMessage;
use integra_core::session::RequestTicket;
use iocraft::prelude::*;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const FRAME_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Clone, Props)]
pub struct StatusLineProps {
    pub context: StatusLineContext,
}

impl Default for StatusLineProps {
    fn default() -> Self {
        Self {
            context: StatusLineContext {
                ui_sender: broadcast::channel(1).0,
            },
        }
    }
}

/// Context for the status line component
#[derive(Debug, Clone)]
pub struct StatusLineContext {
    pub ui_sender: broadcast::Sender<AppMessage>,
}

impl Default for StatusLineContext {
    fn default() -> Self {
        Self {
            ui_sender: broadcast::channel(1).0,
        }
    }
}

/// Text of the status line for a request running `elapsed`
pub fn status_text(ticket: &RequestTicket, elapsed: Duration) -> String {
    let frame = (elapsed.as_millis() / FRAME_INTERVAL.as_millis()) as usize % SPINNER_FRAMES.len();
    format!(
        "{} Calculating… ({}s · request #{})",
        SPINNER_FRAMES[frame],
        elapsed.as_secs(),
        ticket.generation()
    )
}

/// Request the line shows after `message`.
///
/// A presented view or a cancellation only ends the request it names, so a
/// late message for a cleared request leaves a newer one running.
pub fn track_pending(
    current: Option<RequestTicket>,
    message: &AppMessage,
) -> Option<RequestTicket> {
    match message {
        AppMessage::SolveStarted { ticket } => Some(ticket.clone()),
        _ => current.filter(|ticket| !message.ends_solve(ticket)),
    }
}

#[component]
pub fn StatusLine(mut hooks: Hooks, props: &StatusLineProps) -> impl Into<AnyElement<'static>> {
    let pending = hooks.use_state(|| None::<RequestTicket>);
    let start_time = hooks.use_state(Instant::now);

    let ui_sender = props.context.ui_sender.clone();
    let mut pending_clone = pending;
    let mut start_time_clone = start_time;
    hooks.use_future(async move {
        let mut rx = ui_sender.subscribe();
        loop {
            match rx.recv().await {
                Ok(message) => {
                    if matches!(message, AppMessage::SolveStarted { .. }) {
                        start_time_clone.set(Instant::now());
                    }
                    let next = track_pending(pending_clone.read().clone(), &message);
                    if next != *pending_clone.read() {
                        pending_clone.set(next);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Spinner frames
    let tick = hooks.use_state(|| 0u64);
    let mut tick_clone = tick;
    hooks.use_future(async move {
        loop {
            tokio::time::sleep(FRAME_INTERVAL).await;
            tick_clone.set(tick_clone.get().wrapping_add(1));
        }
    });

    let text = match pending.read().as_ref() {
        Some(ticket) => status_text(ticket, start_time.read().elapsed()),
        None => return element! { View {} },
    };

    element! {
        View(padding_left: 1, padding_right: 1) {
            Text(content: text, color: Color::Yellow, weight: Weight::Bold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integra_core::{CalculatorSession, RegionView, ResolvedClientConfig};

    #[test]
    fn test_status_line_props_default() {
        let props = StatusLineProps::default();
        assert_eq!(props.context.ui_sender.receiver_count(), 0);
    }

    #[test]
    fn test_cancel_stops_spinner() {
        let mut session =
            CalculatorSession::new(&ResolvedClientConfig::new("http://localhost".to_string()));
        session.press_key("x");
        let (first, _) = session.begin_solve().unwrap();

        let pending = track_pending(None, &AppMessage::SolveStarted { ticket: first.clone() });
        assert_eq!(pending.as_ref(), Some(&first));
        let notice = AppMessage::Notice("Plot saved".to_string());
        assert_eq!(track_pending(pending.clone(), &notice).as_ref(), Some(&first));

        let cancelled = AppMessage::SolveCancelled {
            ticket: first.clone(),
        };
        assert!(track_pending(pending, &cancelled).is_none());

        // A late view for the cleared request leaves the next one spinning
        session.clear();
        session.press_key("y");
        let (second, request) = session.begin_solve().unwrap();
        let late = AppMessage::SolvePresented {
            ticket: first,
            request,
            view: RegionView::error("late"),
        };
        assert_eq!(
            track_pending(Some(second.clone()), &late).as_ref(),
            Some(&second)
        );
    }

    #[test]
    fn test_status_text() {
        let mut session =
            CalculatorSession::new(&ResolvedClientConfig::new("http://localhost".to_string()));
        session.press_key("x");
        let (ticket, _) = session.begin_solve().unwrap();

        let text = status_text(&ticket, Duration::from_millis(2500));
        assert!(text.contains("Calculating"));
        assert!(text.contains("2s"));
        assert!(text.contains(&format!("#{}", ticket.generation())));
    }
}
