//! Calculation response as returned by the service

use serde::{Deserialize, Serialize};

/// Body returned by `POST /calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub success: bool,

    /// Present iff `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Result as LaTeX
    #[serde(
        default,
        rename = "result_latex",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_markup: Option<String>,

    /// Ordered step descriptions, LaTeX wrapped in `\( \)` delimiters
    #[serde(default)]
    pub steps: Vec<String>,

    #[serde(default, rename = "graph", skip_serializing_if = "Option::is_none")]
    pub plot_data: Option<PlotData>,
}

impl CalculationResponse {
    /// Successful response
    pub fn success(result_markup: impl Into<String>, steps: Vec<String>, plot: PlotData) -> Self {
        Self {
            success: true,
            error: None,
            result_markup: Some(result_markup.into()),
            steps,
            plot_data: Some(plot),
        }
    }

    /// Failed response carrying the server's message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            result_markup: None,
            steps: Vec::new(),
            plot_data: None,
        }
    }
}

/// Sampled curves for plotting.
///
/// The service sends `null` for samples where the function is undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub x: Vec<f64>,

    pub y: Vec<Option<f64>>,

    /// Antiderivative samples over the same `x`
    #[serde(default, rename = "y_int", skip_serializing_if = "Option::is_none")]
    pub antiderivative_y: Option<Vec<Option<f64>>>,

    /// Samples of the shaded area for definite integrals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_x: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_y: Option<Vec<f64>>,
}

impl PlotData {
    /// Antiderivative samples if there are any
    pub fn antiderivative(&self) -> Option<&[Option<f64>]> {
        self.antiderivative_y
            .as_deref()
            .filter(|samples| !samples.is_empty())
    }

    /// Shaded area samples when both coordinates are present
    pub fn area(&self) -> Option<(&[f64], &[f64])> {
        match (&self.area_x, &self.area_y) {
            (Some(x), Some(y)) => Some((x.as_slice(), y.as_slice())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_with_nulls() {
        let body = json!({
            "success": true,
            "result_latex": "\\log{\\left(x \\right)} + C",
            "steps": ["1. step"],
            "graph": {
                "x": [-1.0, 0.0, 1.0],
                "y": [null, null, 1.0],
                "y_int": [null, null, 0.0]
            }
        });
        let response: CalculationResponse = serde_json::from_value(body).unwrap();
        assert!(response.success);
        assert_eq!(
            response.result_markup.as_deref(),
            Some("\\log{\\left(x \\right)} + C")
        );

        let plot = response.plot_data.unwrap();
        assert_eq!(plot.y, vec![None, None, Some(1.0)]);
        assert_eq!(plot.antiderivative().map(|s| s.len()), Some(3));
        assert!(plot.area().is_none());
    }

    #[test]
    fn test_parse_failure() {
        let body = json!({"success": false, "error": "Invalid bounds"});
        let response: CalculationResponse = serde_json::from_value(body).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Invalid bounds"));
        assert!(response.steps.is_empty());
        assert!(response.plot_data.is_none());
    }

    #[test]
    fn test_empty_antiderivative_is_absent() {
        let plot = PlotData {
            antiderivative_y: Some(Vec::new()),
            ..Default::default()
        };
        assert!(plot.antiderivative().is_none());
    }
}
