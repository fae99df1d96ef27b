//! Chart renderers

use super::figure::{Figure, TraceRole};
use crate::error::{ChartError, Result};
use handlebars::Handlebars;
use serde_json::json;
use std::path::Path;
use tracing::debug;

/// Turns a figure into something displayable
pub trait ChartRenderer: Send + Sync {
    fn render(&self, figure: &Figure) -> Result<String>;
}

const PLOTLY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<style>
body { margin: 0; background: #0F172A; color: #F8FAFC; font-family: sans-serif; }
h1 { font-size: 1.1rem; font-weight: normal; margin: 1rem; }
#graph { width: 100vw; height: 85vh; }
</style>
</head>
<body>
<h1>{{title}}</h1>
<div id="graph"></div>
<script>
Plotly.newPlot("graph", {{{traces}}}, {{{layout}}}, { responsive: true, displayModeBar: false });
</script>
</body>
</html>
"#;

/// Standalone HTML page that draws the figure with Plotly.js
pub struct PlotlyHtmlRenderer {
    registry: Handlebars<'static>,
    title: String,
}

impl PlotlyHtmlRenderer {
    const TEMPLATE_NAME: &'static str = "plotly";

    pub fn new(title: impl Into<String>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(Self::TEMPLATE_NAME, PLOTLY_TEMPLATE)
            .map_err(|e| ChartError::Template {
                message: e.to_string(),
            })?;
        Ok(Self {
            registry,
            title: title.into(),
        })
    }

    /// Render the page and write it to `path`
    pub async fn write_to(&self, figure: &Figure, path: impl AsRef<Path>) -> Result<()> {
        let html = self.render(figure)?;
        tokio::fs::write(path.as_ref(), html).await?;
        debug!("Wrote chart to {}", path.as_ref().display());
        Ok(())
    }
}

impl ChartRenderer for PlotlyHtmlRenderer {
    fn render(&self, figure: &Figure) -> Result<String> {
        if figure.is_empty() {
            return Err(ChartError::EmptyFigure.into());
        }
        let data = json!({
            "title": self.title,
            "traces": serde_json::to_string(&figure.traces)?,
            "layout": serde_json::to_string(&figure.layout)?,
        });
        let html = self
            .registry
            .render(Self::TEMPLATE_NAME, &data)
            .map_err(|e| ChartError::Template {
                message: e.to_string(),
            })?;
        Ok(html)
    }
}

/// Character-cell plot for terminals
#[derive(Debug, Clone, Copy)]
pub struct TextPlot {
    pub width: usize,
    pub height: usize,
}

impl Default for TextPlot {
    fn default() -> Self {
        Self {
            width: 60,
            height: 16,
        }
    }
}

impl TextPlot {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(8),
            height: height.max(4),
        }
    }

    fn glyph(role: Option<TraceRole>) -> char {
        match role {
            Some(TraceRole::Antiderivative) => '*',
            Some(TraceRole::Area) => '░',
            _ => '•',
        }
    }

    /// Plot rows, top first, followed by a legend line
    pub fn lines(&self, figure: &Figure) -> Vec<String> {
        let points: Vec<(f64, f64)> = figure.traces.iter().flat_map(|t| t.points()).collect();
        if points.is_empty() {
            return Vec::new();
        }

        let (mut x_min, mut x_max, mut y_min, mut y_max) =
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for (x, y) in &points {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x);
            y_min = y_min.min(*y);
            y_max = y_max.max(*y);
        }
        if (x_max - x_min).abs() < f64::EPSILON {
            x_max = x_min + 1.0;
        }
        if (y_max - y_min).abs() < f64::EPSILON {
            y_min -= 1.0;
            y_max += 1.0;
        }

        let (w, h) = (self.width, self.height);
        let col = |x: f64| (((x - x_min) / (x_max - x_min)) * (w - 1) as f64).round() as usize;
        let row = |y: f64| (((y_max - y) / (y_max - y_min)) * (h - 1) as f64).round() as usize;

        let mut grid = vec![vec![' '; w]; h];

        // Axes first so traces draw over them
        if y_min <= 0.0 && y_max >= 0.0 {
            let r = row(0.0).min(h - 1);
            grid[r].iter_mut().for_each(|c| *c = '─');
        }
        if x_min <= 0.0 && x_max >= 0.0 {
            let c = col(0.0).min(w - 1);
            for line in grid.iter_mut() {
                line[c] = if line[c] == '─' { '┼' } else { '│' };
            }
        }

        // Area first, lines on top
        let mut traces: Vec<_> = figure.traces.iter().collect();
        traces.sort_by_key(|t| t.role != Some(TraceRole::Area));

        for trace in traces {
            let glyph = Self::glyph(trace.role);
            for (x, y) in trace.points() {
                let c = col(x).min(w - 1);
                let r = row(y).min(h - 1);
                if trace.role == Some(TraceRole::Area) {
                    let zero = row(0.0_f64.clamp(y_min, y_max)).min(h - 1);
                    let (top, bottom) = if r <= zero { (r, zero) } else { (zero, r) };
                    for line in grid.iter_mut().take(bottom + 1).skip(top) {
                        line[c] = glyph;
                    }
                } else {
                    grid[r][c] = glyph;
                }
            }
        }

        let mut lines: Vec<String> = grid.into_iter().map(|l| l.into_iter().collect()).collect();
        lines.push(format!(
            "x: [{}, {}]  y: [{}, {}]",
            format_tick(x_min),
            format_tick(x_max),
            format_tick(y_min),
            format_tick(y_max)
        ));
        let legend: Vec<String> = figure
            .traces
            .iter()
            .map(|t| format!("{} {}", Self::glyph(t.role), t.name))
            .collect();
        lines.push(legend.join("   "));
        lines
    }
}

impl ChartRenderer for TextPlot {
    fn render(&self, figure: &Figure) -> Result<String> {
        if figure.is_empty() {
            return Err(ChartError::EmptyFigure.into());
        }
        Ok(self.lines(figure).join("\n"))
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
