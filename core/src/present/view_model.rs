//! View models for the result region

use crate::calc::{IntegralKind, PlotData};
use crate::chart::{ChartAdapter, Figure};
use serde::Serialize;

/// One solution step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    /// Markup as sent by the service
    pub markup: String,
    /// Typeset text, or the markup itself when typesetting failed
    pub rendered: String,
}

/// Everything shown for a successful calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsViewModel {
    /// Integral that was asked for, as LaTeX
    pub integral_markup: String,
    pub rendered_integral: String,
    /// Result LaTeX, kept raw for copying
    pub result_markup: String,
    pub rendered_result: String,
    pub steps: Vec<StepView>,
    pub kind: IntegralKind,
    #[serde(skip)]
    pub plot_data: Option<PlotData>,
    pub figure: Option<Figure>,
}

impl ResultsViewModel {
    /// Rebuild the figure from the retained samples
    pub fn rechart(&mut self, adapter: ChartAdapter) {
        self.figure = self
            .plot_data
            .as_ref()
            .map(|plot| adapter.build(plot, self.kind));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorViewModel {
    pub message: String,
}

/// Full content of the result region.
///
/// The region is always drawn from one of these as a whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegionView {
    #[default]
    Hidden,
    Error(ErrorViewModel),
    Results(Box<ResultsViewModel>),
}

impl RegionView {
    pub fn error(message: impl Into<String>) -> Self {
        RegionView::Error(ErrorViewModel {
            message: message.into(),
        })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RegionView::Error(error) => Some(&error.message),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&ResultsViewModel> {
        match self {
            RegionView::Results(results) => Some(results),
            _ => None,
        }
    }

    pub fn results_mut(&mut self) -> Option<&mut ResultsViewModel> {
        match self {
            RegionView::Results(results) => Some(results),
            _ => None,
        }
    }
}
