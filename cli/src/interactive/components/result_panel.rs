//! Result region
//!
//! The region is laid out from a [`RegionView`] in one pass: the hidden
//! state, an error, or a result with its steps and plot. Nothing from a
//! previous state survives a redraw.

use crate::interactive::text_utils::wrap_text;
use integra_core::chart::TextPlot;
use integra_core::RegionView;
use iocraft::prelude::*;

/// How a region line is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Hint,
    Error,
    Integral,
    Result,
    Heading,
    Step,
    Plot,
    Blank,
}

impl LineStyle {
    fn color(self) -> Color {
        match self {
            LineStyle::Hint | LineStyle::Blank => Color::DarkGrey,
            LineStyle::Error => Color::Rgb {
                r: 244,
                g: 63,
                b: 94,
            },
            LineStyle::Integral => Color::White,
            LineStyle::Result => Color::Rgb {
                r: 34,
                g: 211,
                b: 238,
            },
            LineStyle::Heading => Color::Rgb {
                r: 148,
                g: 163,
                b: 184,
            },
            LineStyle::Step => Color::Rgb {
                r: 226,
                g: 232,
                b: 240,
            },
            LineStyle::Plot => Color::Rgb {
                r: 129,
                g: 140,
                b: 248,
            },
        }
    }

    fn weight(self) -> Weight {
        match self {
            LineStyle::Result | LineStyle::Heading | LineStyle::Error => Weight::Bold,
            _ => Weight::Normal,
        }
    }
}

/// One styled row of the region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLine {
    pub text: String,
    pub style: LineStyle,
}

impl RegionLine {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new("", LineStyle::Blank)
    }
}

/// Lay out the region for a panel `width` cells wide
pub fn region_lines(region: &RegionView, width: usize, plot_height: usize) -> Vec<RegionLine> {
    let width = width.max(10);
    let mut lines = Vec::new();

    match region {
        RegionView::Hidden => {
            lines.push(RegionLine::new(
                "Type a function and press Enter to integrate it.",
                LineStyle::Hint,
            ));
        }
        RegionView::Error(error) => {
            for (i, line) in wrap_text(&error.message, width - 2).into_iter().enumerate() {
                let prefix = if i == 0 { "✗ " } else { "  " };
                lines.push(RegionLine::new(
                    format!("{}{}", prefix, line),
                    LineStyle::Error,
                ));
            }
        }
        RegionView::Results(results) => {
            for line in wrap_text(&results.rendered_integral, width) {
                lines.push(RegionLine::new(line, LineStyle::Integral));
            }
            for line in wrap_text(&format!("= {}", results.rendered_result), width) {
                lines.push(RegionLine::new(line, LineStyle::Result));
            }

            if !results.steps.is_empty() {
                lines.push(RegionLine::blank());
                lines.push(RegionLine::new("Steps", LineStyle::Heading));
                for step in &results.steps {
                    for line in wrap_text(&step.rendered, width - 2) {
                        lines.push(RegionLine::new(format!("  {}", line), LineStyle::Step));
                    }
                }
            }

            if let Some(figure) = results.figure.as_ref().filter(|f| !f.is_empty()) {
                lines.push(RegionLine::blank());
                let plot = TextPlot::new(width.saturating_sub(2), plot_height);
                for line in plot.lines(figure) {
                    lines.push(RegionLine::new(format!("  {}", line), LineStyle::Plot));
                }
            }
        }
    }

    lines
}

#[derive(Default, Props)]
pub struct ResultPanelProps {
    pub region: RegionView,
    /// Inner width in cells
    pub width: u16,
    pub plot_height: u16,
}

#[component]
pub fn ResultPanel(props: &ResultPanelProps) -> impl Into<AnyElement<'static>> {
    let lines = region_lines(
        &props.region,
        props.width as usize,
        props.plot_height as usize,
    );
    let border_color = match &props.region {
        RegionView::Error(_) => LineStyle::Error.color(),
        _ => Color::Rgb {
            r: 51,
            g: 65,
            b: 85,
        },
    };

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: border_color,
            padding_left: 1,
            padding_right: 1,
        ) {
            #(lines.into_iter().enumerate().map(|(i, line)| element! {
                View(key: i) {
                    Text(content: line.text, color: line.style.color(), weight: line.style.weight())
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integra_core::chart::ChartAdapter;
    use integra_core::present::{ResultsViewModel, StepView};
    use integra_core::{IntegralKind, PlotData};

    fn results(plot: Option<PlotData>) -> RegionView {
        let mut view = ResultsViewModel {
            integral_markup: "\\int x^2 \\, dx".to_string(),
            rendered_integral: "∫ x² dx".to_string(),
            result_markup: "\\frac{x^3}{3} + C".to_string(),
            rendered_result: "x³/3 + C".to_string(),
            steps: vec![StepView {
                markup: "1. Power rule".to_string(),
                rendered: "1. Power rule".to_string(),
            }],
            kind: IntegralKind::Indefinite,
            plot_data: plot,
            figure: None,
        };
        view.rechart(ChartAdapter::default());
        RegionView::Results(Box::new(view))
    }

    #[test]
    fn test_hidden_region_shows_hint() {
        let lines = region_lines(&RegionView::Hidden, 40, 8);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].style, LineStyle::Hint);
    }

    #[test]
    fn test_error_region_has_no_result_lines() {
        let lines = region_lines(&RegionView::error("Invalid bounds"), 40, 8);
        assert_eq!(lines, vec![RegionLine::new("✗ Invalid bounds", LineStyle::Error)]);
    }

    #[test]
    fn test_results_region_without_plot() {
        let lines = region_lines(&results(None), 40, 8);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["∫ x² dx", "= x³/3 + C", "", "Steps", "  1. Power rule"]);
        assert!(lines.iter().all(|l| l.style != LineStyle::Plot));
    }

    #[test]
    fn test_results_region_with_plot() {
        let plot = PlotData {
            x: vec![-1.0, 0.0, 1.0],
            y: vec![Some(1.0), Some(0.0), Some(1.0)],
            ..PlotData::default()
        };
        let lines = region_lines(&results(Some(plot)), 40, 8);
        let plot_lines: Vec<_> = lines.iter().filter(|l| l.style == LineStyle::Plot).collect();
        // Grid rows, the range line and the legend
        assert_eq!(plot_lines.len(), 10);
        assert!(plot_lines.last().unwrap().text.contains("f(x)"));
    }
}
