//! Trace descriptors and layout in the shape Plotly consumes

use serde::{Deserialize, Serialize};

/// What a trace shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceRole {
    /// The integrand f(x)
    Function,
    /// The antiderivative F(x)
    Antiderivative,
    /// Shaded area under f(x) between the bounds
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// One Plotly scatter trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Not part of the Plotly descriptor
    #[serde(skip)]
    pub role: Option<TraceRole>,
    pub x: Vec<f64>,
    pub y: Vec<Option<f64>>,
    #[serde(rename = "type")]
    pub trace_type: String,
    pub mode: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
}

impl Trace {
    /// Solid line trace
    pub fn line(
        role: TraceRole,
        name: &str,
        x: Vec<f64>,
        y: Vec<Option<f64>>,
        color: &str,
    ) -> Self {
        Self {
            role: Some(role),
            x,
            y,
            trace_type: "scatter".to_string(),
            mode: "lines".to_string(),
            name: name.to_string(),
            line: Some(Line {
                color: color.to_string(),
                width: 2.5,
                dash: (role == TraceRole::Antiderivative).then(|| "solid".to_string()),
            }),
            fill: None,
            fillcolor: None,
            hoverinfo: None,
        }
    }

    /// Area filled down to the x axis
    pub fn filled_area(name: &str, x: Vec<f64>, y: Vec<f64>, fillcolor: &str) -> Self {
        Self {
            role: Some(TraceRole::Area),
            x,
            y: y.into_iter().map(Some).collect(),
            trace_type: "scatter".to_string(),
            mode: "none".to_string(),
            name: name.to_string(),
            line: None,
            fill: Some("tozeroy".to_string()),
            fillcolor: Some(fillcolor.to_string()),
            hoverinfo: Some("none".to_string()),
        }
    }

    /// Finite `(x, y)` points of the trace
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .filter_map(|(x, y)| y.map(|y| (*x, y)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub r: u32,
    pub b: u32,
    pub l: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub gridcolor: String,
    pub zerolinecolor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
}

/// Plot layout options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub margin: Margin,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub font: Font,
    pub showlegend: bool,
    pub legend: Legend,
    pub hovermode: String,
}

impl Layout {
    /// Dark theme layout with the given y axis title
    pub fn dark(y_title: &str) -> Self {
        let axis = |title: &str| Axis {
            title: title.to_string(),
            gridcolor: "#334155".to_string(),
            zerolinecolor: "#94A3B8".to_string(),
        };
        Self {
            paper_bgcolor: "transparent".to_string(),
            plot_bgcolor: "transparent".to_string(),
            margin: Margin {
                t: 30,
                r: 30,
                b: 50,
                l: 50,
            },
            xaxis: axis("x"),
            yaxis: axis(y_title),
            font: Font {
                color: "#F8FAFC".to_string(),
            },
            showlegend: true,
            legend: Legend { x: 0.0, y: 1.0 },
            hovermode: "x unified".to_string(),
        }
    }
}

/// Traces plus layout, ready for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|t| t.points().next().is_none())
    }

    pub fn trace(&self, role: TraceRole) -> Option<&Trace> {
        self.traces.iter().find(|t| t.role == Some(role))
    }
}
