//! Builds chart figures from the service's plot samples

use super::figure::{Figure, Layout, Trace, TraceRole};
use crate::calc::{IntegralKind, PlotData};
use tracing::debug;

const FUNCTION_COLOR: &str = "#22D3EE";
const ANTIDERIVATIVE_COLOR: &str = "#F43F5E";
const AREA_FILL: &str = "rgba(79, 70, 229, 0.4)";

/// Turns plot samples into traces.
///
/// With `dual_graph` on the antiderivative replaces the integrand, as long
/// as the service sent antiderivative samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartAdapter {
    pub dual_graph: bool,
}

impl ChartAdapter {
    pub fn new(dual_graph: bool) -> Self {
        Self { dual_graph }
    }

    pub fn build(&self, plot: &PlotData, kind: IntegralKind) -> Figure {
        let antiderivative = self.dual_graph.then(|| plot.antiderivative()).flatten();

        if let Some(y_int) = antiderivative {
            debug!(samples = y_int.len(), "Plotting antiderivative");
            return Figure {
                traces: vec![Trace::line(
                    TraceRole::Antiderivative,
                    "F(x)",
                    plot.x.clone(),
                    y_int.to_vec(),
                    ANTIDERIVATIVE_COLOR,
                )],
                layout: Layout::dark("F(x)"),
            };
        }

        let mut traces = vec![Trace::line(
            TraceRole::Function,
            "f(x)",
            plot.x.clone(),
            plot.y.clone(),
            FUNCTION_COLOR,
        )];

        if kind.is_definite() {
            if let Some((area_x, area_y)) = plot.area() {
                traces.push(Trace::filled_area(
                    "Área",
                    area_x.to_vec(),
                    area_y.to_vec(),
                    AREA_FILL,
                ));
            }
        }

        debug!(traces = traces.len(), "Plotting integrand");
        Figure {
            traces,
            layout: Layout::dark(if self.dual_graph { "F(x)" } else { "f(x)" }),
        }
    }
}
