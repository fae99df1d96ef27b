//! Messages exchanged between background tasks and the interactive UI
//!
//! Network calls and history I/O run on tokio tasks; their results come
//! back to the components over a broadcast channel of [`AppMessage`]s.

use integra_core::session::RequestTicket;
use integra_core::{
    CalculationRequest, CalculatorClient, CalculatorSession, HistoryEntry, RegionView,
    ResultPresenter, SolveOutcome,
};
use integra_core::chart::{ChartAdapter, Figure, PlotlyHtmlRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Message types for the interactive app
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A request left for the service
    SolveStarted { ticket: RequestTicket },
    /// The service answered or the transport failed
    SolveCompleted {
        ticket: RequestTicket,
        outcome: SolveOutcome,
    },
    /// The region view for a completed request is ready
    SolvePresented {
        ticket: RequestTicket,
        request: CalculationRequest,
        view: RegionView,
    },
    /// The request was cleared before it finished
    SolveCancelled { ticket: RequestTicket },
    /// The history panel content
    HistoryLoaded(Vec<HistoryEntry>),
    /// One-line feedback for the footer
    Notice(String),
}

impl AppMessage {
    /// Whether this message ends the pending phase of `ticket`
    pub fn ends_solve(&self, ticket: &RequestTicket) -> bool {
        match self {
            AppMessage::SolvePresented { ticket: ended, .. }
            | AppMessage::SolveCancelled { ticket: ended } => ended == ticket,
            _ => false,
        }
    }
}

/// Send a request in the background
pub fn spawn_solve(
    runtime: &Handle,
    client: Arc<dyn CalculatorClient>,
    ticket: RequestTicket,
    request: CalculationRequest,
    ui_sender: broadcast::Sender<AppMessage>,
) {
    let _ = ui_sender.send(AppMessage::SolveStarted {
        ticket: ticket.clone(),
    });

    runtime.spawn(async move {
        let outcome = integra_core::session::fetch_outcome(client.as_ref(), &request).await;
        debug!(ticket = %ticket, "Request finished");
        let _ = ui_sender.send(AppMessage::SolveCompleted { ticket, outcome });
    });
}

/// Turn an accepted outcome into a region view in the background
pub fn spawn_present(
    runtime: &Handle,
    presenter: Arc<ResultPresenter>,
    ticket: RequestTicket,
    request: CalculationRequest,
    outcome: SolveOutcome,
    chart: ChartAdapter,
    ui_sender: broadcast::Sender<AppMessage>,
) {
    runtime.spawn(async move {
        let view = presenter.present(&request, &outcome, chart);
        let _ = ui_sender.send(AppMessage::SolvePresented {
            ticket,
            request,
            view,
        });
    });
}

/// Append a shown success to the history in the background
pub fn spawn_history_record(
    runtime: &Handle,
    presenter: Arc<ResultPresenter>,
    request: CalculationRequest,
) -> tokio::task::JoinHandle<()> {
    runtime.spawn(async move { presenter.record(&request).await })
}

/// Handle `SolveCompleted`: present the outcome if `ticket` is still awaited.
///
/// Returns false when the answer belongs to a cleared request.
pub fn accept_completion(
    session: &CalculatorSession,
    runtime: &Handle,
    presenter: Arc<ResultPresenter>,
    ticket: RequestTicket,
    outcome: SolveOutcome,
    ui_sender: &broadcast::Sender<AppMessage>,
) -> bool {
    let Some(request) = session.complete(&ticket) else {
        debug!(ticket = %ticket, "Dropping stale response");
        return false;
    };
    spawn_present(
        runtime,
        presenter,
        ticket,
        request,
        outcome,
        session.chart(),
        ui_sender.clone(),
    );
    true
}

/// Handle `SolvePresented`: show the view, then record a shown success.
///
/// Returns the history write when one was started.
pub fn accept_view(
    session: &mut CalculatorSession,
    runtime: &Handle,
    presenter: Arc<ResultPresenter>,
    ticket: &RequestTicket,
    request: CalculationRequest,
    view: RegionView,
) -> Option<tokio::task::JoinHandle<()>> {
    if !session.show(ticket, view) {
        debug!(ticket = %ticket, "Dropping stale view");
        return None;
    }
    if session.region().results().is_none() {
        return None;
    }
    Some(spawn_history_record(runtime, presenter, request))
}

/// Announce that the request awaited `before` a key press is gone
pub fn notify_cancelled(
    before: Option<RequestTicket>,
    session: &CalculatorSession,
    ui_sender: &broadcast::Sender<AppMessage>,
) -> bool {
    match before {
        Some(ticket) if !session.is_current(&ticket) => {
            debug!(ticket = %ticket, "Request cancelled");
            let _ = ui_sender.send(AppMessage::SolveCancelled { ticket });
            true
        }
        _ => false,
    }
}

/// Load the history for the panel in the background
pub fn spawn_history_load(
    runtime: &Handle,
    presenter: Arc<ResultPresenter>,
    ui_sender: broadcast::Sender<AppMessage>,
) {
    runtime.spawn(async move {
        match presenter.history().load().await {
            Ok(history) => {
                let _ = ui_sender.send(AppMessage::HistoryLoaded(history.to_vec()));
            }
            Err(e) => {
                warn!("Failed to load history: {}", e);
                let _ = ui_sender.send(AppMessage::HistoryLoaded(Vec::new()));
            }
        }
    });
}

/// Write the current figure as a standalone HTML page
pub fn spawn_plot_export(
    runtime: &Handle,
    figure: Figure,
    path: PathBuf,
    ui_sender: broadcast::Sender<AppMessage>,
) {
    runtime.spawn(async move {
        let written = match PlotlyHtmlRenderer::new("Integra") {
            Ok(renderer) => renderer.write_to(&figure, &path).await,
            Err(e) => Err(e),
        };
        let notice = match written {
            Ok(()) => format!("Plot saved to {}", path.display()),
            Err(e) => {
                warn!("Failed to save plot: {}", e);
                format!("Could not save the plot: {}", e)
            }
        };
        let _ = ui_sender.send(AppMessage::Notice(notice));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use integra_core::calc::PlotData;
    use integra_core::present::RawTypesetter;
    use integra_core::{
        CalculationResponse, HistoryStore, HttpCalculatorClient, IntegralKind,
        MemoryHistoryStore, ResolvedClientConfig, UiPhase,
    };

    fn session() -> CalculatorSession {
        CalculatorSession::new(&ResolvedClientConfig::new("http://localhost".to_string()))
    }

    fn presenter(history: Arc<MemoryHistoryStore>) -> Arc<ResultPresenter> {
        Arc::new(ResultPresenter::new(Arc::new(RawTypesetter), history))
    }

    fn success() -> SolveOutcome {
        SolveOutcome::Response(CalculationResponse::success(
            "x^2/2+C",
            Vec::new(),
            PlotData::default(),
        ))
    }

    #[tokio::test]
    async fn test_present_round_trip_over_channel() {
        let (ui_sender, mut rx) = broadcast::channel(16);
        let history = Arc::new(MemoryHistoryStore::default());

        let mut session = session();
        session.press_key("x");
        let (ticket, request) = session.begin_solve().unwrap();
        assert_eq!(request.kind, IntegralKind::Indefinite);

        spawn_present(
            &Handle::current(),
            presenter(history.clone()),
            ticket.clone(),
            request,
            SolveOutcome::Response(CalculationResponse::failure("Invalid bounds")),
            session.chart(),
            ui_sender,
        );

        let message = rx.recv().await.unwrap();
        assert!(message.ends_solve(&ticket));
        let AppMessage::SolvePresented {
            ticket: got,
            request,
            view,
        } = message
        else {
            panic!("unexpected message");
        };
        assert_eq!(got, ticket);

        // Errors are shown but never recorded
        let record = accept_view(
            &mut session,
            &Handle::current(),
            presenter(history.clone()),
            &got,
            request,
            view,
        );
        assert!(record.is_none());
        assert_eq!(session.region().error_message(), Some("Invalid bounds"));
        assert!(history.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shown_success_is_recorded() {
        let (ui_sender, mut rx) = broadcast::channel(16);
        let history = Arc::new(MemoryHistoryStore::default());
        let runtime = Handle::current();

        let mut session = session();
        session.press_key("x");
        let (ticket, _) = session.begin_solve().unwrap();

        assert!(accept_completion(
            &session,
            &runtime,
            presenter(history.clone()),
            ticket.clone(),
            success(),
            &ui_sender,
        ));
        let AppMessage::SolvePresented {
            ticket,
            request,
            view,
        } = rx.recv().await.unwrap()
        else {
            panic!("unexpected message");
        };

        let record = accept_view(
            &mut session,
            &runtime,
            presenter(history.clone()),
            &ticket,
            request,
            view,
        )
        .expect("success should be recorded");
        record.await.unwrap();

        assert_eq!(session.phase(), UiPhase::ResultsShown);
        let stored = history.load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.head().unwrap().expression, "x");
    }

    #[tokio::test]
    async fn test_clear_before_view_skips_history() {
        let (ui_sender, mut rx) = broadcast::channel(16);
        let history = Arc::new(MemoryHistoryStore::default());
        let runtime = Handle::current();

        let mut session = session();
        session.press_key("x");
        let (ticket, _) = session.begin_solve().unwrap();
        assert!(accept_completion(
            &session,
            &runtime,
            presenter(history.clone()),
            ticket.clone(),
            success(),
            &ui_sender,
        ));

        // Cleared while the view is being built
        let before = session.pending_ticket().cloned();
        session.clear();
        assert!(notify_cancelled(before, &session, &ui_sender));

        let mut presented = None;
        for _ in 0..2 {
            match rx.recv().await.unwrap() {
                AppMessage::SolveCancelled { ticket: cancelled } => assert_eq!(cancelled, ticket),
                AppMessage::SolvePresented {
                    ticket,
                    request,
                    view,
                } => presented = Some((ticket, request, view)),
                other => panic!("unexpected message: {:?}", other),
            }
        }
        let (ticket, request, view) = presented.unwrap();

        let record = accept_view(
            &mut session,
            &runtime,
            presenter(history.clone()),
            &ticket,
            request,
            view,
        );
        assert!(record.is_none());
        assert_eq!(session.phase(), UiPhase::Idle);
        assert!(history.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_while_pending_drops_late_response() {
        let (ui_sender, mut rx) = broadcast::channel(16);
        let history = Arc::new(MemoryHistoryStore::default());
        let runtime = Handle::current();
        // Nothing listens on the discard port
        let client = Arc::new(
            HttpCalculatorClient::new(&ResolvedClientConfig::new(
                "http://127.0.0.1:9".to_string(),
            ))
            .unwrap(),
        );

        let mut session = session();
        session.press_key("x");
        let (ticket, request) = session.begin_solve().unwrap();
        spawn_solve(&runtime, client, ticket.clone(), request, ui_sender.clone());

        let before = session.pending_ticket().cloned();
        session.clear();
        assert!(notify_cancelled(before, &session, &ui_sender));

        let started = rx.recv().await.unwrap();
        assert!(matches!(started, AppMessage::SolveStarted { .. }));
        assert!(!started.ends_solve(&ticket));
        let cancelled = rx.recv().await.unwrap();
        assert!(cancelled.ends_solve(&ticket));

        let AppMessage::SolveCompleted { ticket, outcome } = rx.recv().await.unwrap() else {
            panic!("unexpected message");
        };
        assert!(!accept_completion(
            &session,
            &runtime,
            presenter(history.clone()),
            ticket,
            outcome,
            &ui_sender,
        ));
        assert!(rx.try_recv().is_err());
        assert_eq!(session.phase(), UiPhase::Idle);
        assert!(history.load().await.unwrap().is_empty());
    }

    #[test]
    fn test_edits_while_pending_do_not_cancel() {
        let (ui_sender, mut rx) = broadcast::channel(4);
        let mut session = session();
        session.press_key("x");
        session.begin_solve().unwrap();

        let before = session.pending_ticket().cloned();
        session.press_key("+1");
        assert!(!notify_cancelled(before, &session, &ui_sender));
        assert!(!notify_cancelled(None, &session, &ui_sender));
        assert!(rx.try_recv().is_err());
    }
}
