//! Solve session: the calculator's UI state machine
//!
//! `Idle -> Pending -> ResultsShown | ErrorShown`, back to `Idle` on clear.
//! Each solve gets a [`RequestTicket`]; starting a new solve or clearing
//! invalidates older tickets so late completions are dropped.

use crate::calc::{CalculationRequest, CalculationResponse, CalculatorClient, IntegralKind};
use crate::chart::ChartAdapter;
use crate::clipboard::{Clipboard, CopyNotice};
use crate::config::ResolvedClientConfig;
use crate::error::{Result, ValidationError};
use crate::history::HistoryEntry;
use crate::input::{FieldRef, InputRouter, Key, KeyAction, TextField};
use crate::present::{RegionView, ResultPresenter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Phase of the result region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiPhase {
    #[default]
    Idle,
    Pending,
    ResultsShown,
    ErrorShown,
}

/// Identifies one solve request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    generation: u64,
    id: Uuid,
}

impl RequestTicket {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            id: Uuid::new_v4(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.generation, self.id)
    }
}

/// What came back for a request
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// The service answered, successfully or not
    Response(CalculationResponse),
    /// No usable answer: connection, status or decoding failure
    TransportFailure(String),
}

impl From<Result<CalculationResponse>> for SolveOutcome {
    fn from(result: Result<CalculationResponse>) -> Self {
        match result {
            Ok(response) => SolveOutcome::Response(response),
            Err(e) => SolveOutcome::TransportFailure(e.to_string()),
        }
    }
}

/// Send `request` and fold any error into a transport failure
pub async fn fetch_outcome(
    client: &dyn CalculatorClient,
    request: &CalculationRequest,
) -> SolveOutcome {
    debug!("POST {} for '{}'", client.endpoint(), request.expression);
    client.calculate(request).await.into()
}

/// Result of pressing a keypad key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The active field changed (or a no-op edit, when false)
    Edited(bool),
    Cleared,
    /// The caller should start a solve
    SolveRequested,
}

/// All state behind one calculator screen
#[derive(Debug)]
pub struct CalculatorSession {
    router: InputRouter,
    kind: IntegralKind,
    graph_range: String,
    chart: ChartAdapter,
    phase: UiPhase,
    generation: u64,
    in_flight: Option<(RequestTicket, CalculationRequest)>,
    region: RegionView,
    copy_notice: CopyNotice,
}

impl CalculatorSession {
    pub fn new(config: &ResolvedClientConfig) -> Self {
        Self {
            router: InputRouter::new(),
            kind: IntegralKind::default(),
            graph_range: config.graph_range.clone(),
            chart: ChartAdapter::new(config.dual_graph),
            phase: UiPhase::Idle,
            generation: 0,
            in_flight: None,
            region: RegionView::Hidden,
            copy_notice: CopyNotice::default(),
        }
    }

    pub fn phase(&self) -> UiPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == UiPhase::Pending
    }

    pub fn kind(&self) -> IntegralKind {
        self.kind
    }

    pub fn chart(&self) -> ChartAdapter {
        self.chart
    }

    pub fn dual_graph(&self) -> bool {
        self.chart.dual_graph
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn field(&self, field: FieldRef) -> &TextField {
        self.router.field(field)
    }

    pub fn active_field(&self) -> FieldRef {
        self.router.current_field()
    }

    pub fn region(&self) -> &RegionView {
        &self.region
    }

    /// Fields currently shown; bounds only for definite integrals
    pub fn visible_fields(&self) -> &'static [FieldRef] {
        if self.kind.is_definite() {
            &FieldRef::ALL
        } else {
            &[FieldRef::Expression]
        }
    }

    /// Focus event on `field`; hidden fields cannot take focus
    pub fn focus(&mut self, field: FieldRef) -> bool {
        if !self.visible_fields().contains(&field) {
            return false;
        }
        self.router.on_focus(field);
        true
    }

    pub fn blur(&mut self) {
        self.router.blur();
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let visible = self.visible_fields();
        self.router.cycle_focus(visible, forward);
    }

    /// Replace a field's value without moving focus
    pub fn set_field(&mut self, field: FieldRef, value: impl Into<String>) {
        self.router.set_value(field, value);
    }

    pub fn press_key(&mut self, value: &str) -> bool {
        self.router.press_key(value)
    }

    pub fn backspace(&mut self) -> bool {
        self.router.backspace()
    }

    pub fn delete_forward(&mut self) -> bool {
        self.router.delete_forward()
    }

    /// Cursor movement and selection on the active field
    pub fn edit(&mut self, edit: impl FnOnce(&mut TextField)) {
        self.router.edit_active(edit);
    }

    /// Dispatch a keypad key
    pub fn apply_key(&mut self, key: &Key) -> KeyOutcome {
        match key.action {
            KeyAction::Insert(value) => KeyOutcome::Edited(self.press_key(value)),
            KeyAction::Backspace => KeyOutcome::Edited(self.backspace()),
            KeyAction::Clear => {
                self.clear();
                KeyOutcome::Cleared
            }
            KeyAction::Solve => KeyOutcome::SolveRequested,
        }
    }

    /// Empty the fields, hide the region and drop any in-flight request
    pub fn clear(&mut self) {
        self.router.clear();
        self.invalidate();
        self.region = RegionView::Hidden;
        self.phase = UiPhase::Idle;
    }

    pub fn set_kind(&mut self, kind: IntegralKind) {
        self.kind = kind;
        if !self.visible_fields().contains(&self.router.current_field()) {
            self.router.on_focus(FieldRef::Expression);
        }
    }

    pub fn toggle_kind(&mut self) {
        self.set_kind(self.kind.toggled());
    }

    /// Switch between the integrand and antiderivative plots.
    ///
    /// The shown figure is rebuilt from the retained samples.
    pub fn set_dual_graph(&mut self, dual_graph: bool) {
        self.chart = ChartAdapter::new(dual_graph);
        if let Some(results) = self.region.results_mut() {
            results.rechart(self.chart);
        }
    }

    pub fn toggle_dual_graph(&mut self) {
        self.set_dual_graph(!self.chart.dual_graph);
    }

    /// Put a past calculation back into the fields
    pub fn restore_history(&mut self, entry: &HistoryEntry) {
        self.router
            .set_value(FieldRef::Expression, entry.expression.clone());
        self.set_kind(entry.kind);
        if entry.kind.is_definite() {
            self.router
                .set_value(FieldRef::LowerBound, entry.lower_bound.clone());
            self.router
                .set_value(FieldRef::UpperBound, entry.upper_bound.clone());
        }
        self.router.on_focus(FieldRef::Expression);
    }

    /// Validate the fields and start a request.
    ///
    /// A validation failure is shown in the region and no request is made.
    pub fn begin_solve(
        &mut self,
    ) -> std::result::Result<(RequestTicket, CalculationRequest), ValidationError> {
        if self.is_pending() {
            return Err(ValidationError::RequestPending);
        }

        let request =
            match CalculationRequest::from_fields(self.router.fields(), self.kind, &self.graph_range)
            {
                Ok(request) => request,
                Err(e) => {
                    debug!("Rejected solve: {}", e);
                    self.region = RegionView::error(e.to_string());
                    self.phase = UiPhase::ErrorShown;
                    return Err(e);
                }
            };

        self.generation += 1;
        let ticket = RequestTicket::new(self.generation);
        info!(ticket = %ticket, kind = %request.kind, "Solving '{}'", request.expression);

        self.in_flight = Some((ticket.clone(), request.clone()));
        self.region = RegionView::Hidden;
        self.phase = UiPhase::Pending;
        Ok((ticket, request))
    }

    /// Ticket of the request still awaited, if any
    pub fn pending_ticket(&self) -> Option<&RequestTicket> {
        self.in_flight.as_ref().map(|(ticket, _)| ticket)
    }

    /// Whether `ticket` belongs to the request still awaited
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        matches!(&self.in_flight, Some((current, _)) if current == ticket)
    }

    /// Accept a completion for `ticket`.
    ///
    /// Returns the request to present, or `None` when the ticket has been
    /// superseded or cleared.
    pub fn complete(&self, ticket: &RequestTicket) -> Option<CalculationRequest> {
        match &self.in_flight {
            Some((current, request)) if current == ticket => Some(request.clone()),
            _ => {
                debug!(ticket = %ticket, "Discarding stale completion");
                None
            }
        }
    }

    /// Show the presented view for `ticket` and leave `Pending`
    pub fn show(&mut self, ticket: &RequestTicket, view: RegionView) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = %ticket, "Discarding stale view");
            return false;
        }
        self.in_flight = None;
        self.phase = match view {
            RegionView::Hidden => UiPhase::Idle,
            RegionView::Error(_) => UiPhase::ErrorShown,
            RegionView::Results(_) => UiPhase::ResultsShown,
        };
        self.region = view;
        // The plot flag may have been toggled while the request was out
        let chart = self.chart;
        if let Some(results) = self.region.results_mut() {
            results.rechart(chart);
        }
        true
    }

    /// Run one full solve in place
    pub async fn solve(
        &mut self,
        client: &dyn CalculatorClient,
        presenter: &ResultPresenter,
    ) -> std::result::Result<&RegionView, ValidationError> {
        let (ticket, request) = self.begin_solve()?;
        let outcome = fetch_outcome(client, &request).await;
        let view = presenter.present(&request, &outcome, self.chart);
        if self.show(&ticket, view) && self.region.results().is_some() {
            presenter.record(&request).await;
        }
        Ok(&self.region)
    }

    /// Copy the result markup. Returns false when there is nothing to copy.
    pub fn copy_result(&mut self, clipboard: &dyn Clipboard, now: Instant) -> Result<bool> {
        let Some(results) = self.region.results() else {
            return Ok(false);
        };
        if results.result_markup.is_empty() {
            return Ok(false);
        }
        clipboard.copy(&results.result_markup)?;
        self.copy_notice.mark(now);
        Ok(true)
    }

    /// "Copied!" for a short while after a copy
    pub fn copy_label(&self, now: Instant) -> &'static str {
        self.copy_notice.label(now)
    }

    fn invalidate(&mut self) {
        if let Some((ticket, _)) = self.in_flight.take() {
            debug!(ticket = %ticket, "Invalidated in-flight request");
        }
    }
}
