//! Turns solve outcomes into region views

use super::typeset::MathTypesetter;
use super::view_model::{RegionView, ResultsViewModel, StepView};
use crate::calc::{CalculationRequest, CalculationResponse};
use crate::chart::ChartAdapter;
use crate::history::{HistoryEntry, HistoryStore};
use crate::session::SolveOutcome;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown for any transport failure
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error with the server. Check that the calculation service is running.";

/// Shown when the service reports failure without a message
pub const UNKNOWN_SERVER_ERROR_MESSAGE: &str = "The server could not compute this integral.";

pub struct ResultPresenter {
    typesetter: Arc<dyn MathTypesetter>,
    history: Arc<dyn HistoryStore>,
}

impl ResultPresenter {
    pub fn new(typesetter: Arc<dyn MathTypesetter>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            typesetter,
            history,
        }
    }

    pub fn history(&self) -> Arc<dyn HistoryStore> {
        Arc::clone(&self.history)
    }

    /// Typeset `markup`, falling back to the markup itself
    pub fn render_markup(&self, markup: &str) -> String {
        match self.typesetter.typeset(markup) {
            Ok(text) => text,
            Err(e) => {
                warn!("Showing raw markup: {}", e);
                markup.to_string()
            }
        }
    }

    /// Build the region view for one finished solve.
    ///
    /// Nothing is recorded here. Callers [`record`](Self::record) a success
    /// once its view has actually been shown.
    pub fn present(
        &self,
        request: &CalculationRequest,
        outcome: &SolveOutcome,
        chart: ChartAdapter,
    ) -> RegionView {
        match outcome {
            SolveOutcome::TransportFailure(reason) => {
                warn!("Calculation request failed: {}", reason);
                RegionView::error(CONNECTION_ERROR_MESSAGE)
            }
            SolveOutcome::Response(response) if !response.success => {
                let message = response
                    .error
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_SERVER_ERROR_MESSAGE.to_string());
                info!("Server rejected calculation: {}", message);
                RegionView::error(message)
            }
            SolveOutcome::Response(response) => {
                RegionView::Results(Box::new(self.results(request, response, chart)))
            }
        }
    }

    fn results(
        &self,
        request: &CalculationRequest,
        response: &CalculationResponse,
        chart: ChartAdapter,
    ) -> ResultsViewModel {
        let result_markup = response.result_markup.clone().unwrap_or_default();
        let integral_markup = request.integral_latex();

        let steps = response
            .steps
            .iter()
            .map(|markup| StepView {
                rendered: self.render_markup(markup),
                markup: markup.clone(),
            })
            .collect();

        let figure = response
            .plot_data
            .as_ref()
            .map(|plot| chart.build(plot, request.kind));

        ResultsViewModel {
            rendered_integral: self.render_markup(&integral_markup),
            integral_markup,
            rendered_result: self.render_markup(&result_markup),
            result_markup,
            steps,
            kind: request.kind,
            plot_data: response.plot_data.clone(),
            figure,
        }
    }

    /// Append a shown success to the history.
    ///
    /// Storage failures are logged and never reach the user.
    pub async fn record(&self, request: &CalculationRequest) {
        match self.history.append(HistoryEntry::from_request(request)).await {
            Ok(true) => debug!("Recorded '{}' in history", request.expression),
            Ok(false) => debug!("'{}' repeats the latest history entry", request.expression),
            Err(e) => warn!("Failed to record history: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{IntegralKind, PlotData};
    use crate::chart::TraceRole;
    use crate::error::{HistoryError, Result};
    use crate::history::{History, MemoryHistoryStore};
    use crate::present::{PlainTextTypesetter, RawTypesetter};
    use async_trait::async_trait;

    fn presenter(history: Arc<dyn HistoryStore>) -> ResultPresenter {
        ResultPresenter::new(Arc::new(PlainTextTypesetter), history)
    }

    fn x_squared() -> CalculationRequest {
        CalculationRequest::new("x^2", IntegralKind::Indefinite, "", "", "-10,10").unwrap()
    }

    fn plot() -> PlotData {
        PlotData {
            x: vec![-1.0, 0.0, 1.0],
            y: vec![Some(1.0), Some(0.0), Some(1.0)],
            antiderivative_y: Some(vec![Some(-0.33), Some(0.0), Some(0.33)]),
            area_x: Some(vec![0.0, 1.0]),
            area_y: Some(vec![0.0, 1.0]),
        }
    }

    #[tokio::test]
    async fn test_indefinite_success() {
        let history = Arc::new(MemoryHistoryStore::default());
        let response = CalculationResponse::success(
            "\\frac{x^3}{3}+C",
            vec!["1. Power rule: \\( \\int x^{n} dx = \\frac{x^{n+1}}{n+1} \\)".to_string()],
            plot(),
        );

        let presenter = presenter(history.clone());
        let view = presenter.present(
            &x_squared(),
            &SolveOutcome::Response(response),
            ChartAdapter::default(),
        );

        let results = view.results().unwrap();
        assert_eq!(results.result_markup, "\\frac{x^3}{3}+C");
        assert_eq!(results.rendered_result, "x³/3+C");
        assert_eq!(results.steps.len(), 1);
        assert_eq!(
            results.steps[0].rendered,
            "1. Power rule: ∫ xⁿ dx = xⁿ⁺¹/(n+1)"
        );
        let figure = results.figure.as_ref().unwrap();
        assert_eq!(figure.traces.len(), 1);
        assert_eq!(figure.traces[0].role, Some(TraceRole::Function));

        // Presenting alone leaves the history alone
        assert!(history.load().await.unwrap().is_empty());

        presenter.record(&x_squared()).await;
        let stored = history.load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.head().unwrap().expression, "x^2");
        assert_eq!(stored.head().unwrap().kind, IntegralKind::Indefinite);
    }

    #[tokio::test]
    async fn test_server_error_shown_verbatim() {
        let history = Arc::new(MemoryHistoryStore::default());
        let request =
            CalculationRequest::new("x", IntegralKind::Definite, "a", "b", "-10,10").unwrap();

        let view = presenter(history.clone())
            .present(
                &request,
                &SolveOutcome::Response(CalculationResponse::failure("Invalid bounds")),
                ChartAdapter::default(),
            );

        assert_eq!(view.error_message(), Some("Invalid bounds"));
        assert!(history.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_generic_message() {
        let history = Arc::new(MemoryHistoryStore::default());
        let view = presenter(history.clone())
            .present(
                &x_squared(),
                &SolveOutcome::TransportFailure("connection refused".to_string()),
                ChartAdapter::default(),
            );

        assert_eq!(view.error_message(), Some(CONNECTION_ERROR_MESSAGE));
        assert!(history.load().await.unwrap().is_empty());
    }

    #[test]
    fn test_dual_graph_figure() {
        let request =
            CalculationRequest::new("x^2", IntegralKind::Definite, "0", "1", "-10,10").unwrap();
        let response = CalculationResponse::success("\\frac{1}{3}", Vec::new(), plot());

        let mut view = presenter(Arc::new(MemoryHistoryStore::default()))
            .present(
                &request,
                &SolveOutcome::Response(response),
                ChartAdapter::new(true),
            );

        let figure = view.results().unwrap().figure.clone().unwrap();
        assert_eq!(figure.traces.len(), 1);
        assert_eq!(figure.traces[0].name, "F(x)");
        assert_eq!(figure.layout.yaxis.title, "F(x)");

        // Switching back redraws the integrand with its area
        view.results_mut().unwrap().rechart(ChartAdapter::new(false));
        let figure = view.results().unwrap().figure.clone().unwrap();
        assert_eq!(figure.traces.len(), 2);
        assert!(figure.trace(TraceRole::Area).is_some());
    }

    #[test]
    fn test_typeset_failure_falls_back_to_markup() {
        let response =
            CalculationResponse::success("\\frac{x}{3", vec!["\\( x^{2 \\)".to_string()], plot());
        let view = presenter(Arc::new(MemoryHistoryStore::default()))
            .present(
                &x_squared(),
                &SolveOutcome::Response(response),
                ChartAdapter::default(),
            );

        let results = view.results().unwrap();
        assert_eq!(results.rendered_result, "\\frac{x}{3");
        assert_eq!(results.steps[0].rendered, "\\( x^{2 \\)");
    }

    struct FailingStore;

    #[async_trait]
    impl HistoryStore for FailingStore {
        async fn load(&self) -> Result<History> {
            Ok(History::new(10))
        }

        async fn append(&self, _entry: HistoryEntry) -> Result<bool> {
            Err(HistoryError::SaveFailed {
                path: "/nowhere".to_string(),
                message: "read-only".to_string(),
            }
            .into())
        }

        async fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_history_failure_not_surfaced() {
        let presenter = ResultPresenter::new(Arc::new(RawTypesetter), Arc::new(FailingStore));
        let response = CalculationResponse::success("x", Vec::new(), PlotData::default());
        let view = presenter.present(
            &x_squared(),
            &SolveOutcome::Response(response),
            ChartAdapter::default(),
        );
        presenter.record(&x_squared()).await;
        assert!(view.results().is_some());
    }
}
