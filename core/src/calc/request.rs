//! Calculation request and its client-side validation

use crate::error::ValidationError;
use crate::input::FieldSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of integral to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegralKind {
    /// Antiderivative plus constant
    #[default]
    Indefinite,
    /// Integral between two bounds
    Definite,
}

impl IntegralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegralKind::Indefinite => "indefinite",
            IntegralKind::Definite => "definite",
        }
    }

    pub fn is_definite(&self) -> bool {
        matches!(self, IntegralKind::Definite)
    }

    /// The other kind
    pub fn toggled(&self) -> Self {
        match self {
            IntegralKind::Indefinite => IntegralKind::Definite,
            IntegralKind::Definite => IntegralKind::Indefinite,
        }
    }
}

impl fmt::Display for IntegralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegralKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indefinite" => Ok(IntegralKind::Indefinite),
            "definite" => Ok(IntegralKind::Definite),
            other => Err(format!("Unknown integral type: {}", other)),
        }
    }
}

/// Body of `POST /calculate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    #[serde(rename = "function")]
    pub expression: String,
    #[serde(rename = "type")]
    pub kind: IntegralKind,
    #[serde(rename = "lower_limit")]
    pub lower_bound: String,
    #[serde(rename = "upper_limit")]
    pub upper_bound: String,
    pub graph_range: String,
}

impl CalculationRequest {
    /// Build and validate a request.
    ///
    /// Values are trimmed. Bounds are only sent for definite integrals and
    /// must both be non-empty then.
    pub fn new(
        expression: &str,
        kind: IntegralKind,
        lower_bound: &str,
        upper_bound: &str,
        graph_range: &str,
    ) -> Result<Self, ValidationError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ValidationError::EmptyExpression);
        }

        let (lower_bound, upper_bound) = match kind {
            IntegralKind::Definite => {
                let (lower, upper) = (lower_bound.trim(), upper_bound.trim());
                if lower.is_empty() || upper.is_empty() {
                    return Err(ValidationError::MissingBounds);
                }
                (lower.to_string(), upper.to_string())
            }
            IntegralKind::Indefinite => (String::new(), String::new()),
        };

        Ok(Self {
            expression: expression.to_string(),
            kind,
            lower_bound,
            upper_bound,
            graph_range: graph_range.trim().to_string(),
        })
    }

    /// Build a request from the current field values
    pub fn from_fields(
        fields: &FieldSet,
        kind: IntegralKind,
        graph_range: &str,
    ) -> Result<Self, ValidationError> {
        Self::new(
            fields.expression.value(),
            kind,
            fields.lower_bound.value(),
            fields.upper_bound.value(),
            graph_range,
        )
    }

    /// LaTeX of the integral being asked for
    pub fn integral_latex(&self) -> String {
        integral_latex(&self.expression, self.kind, &self.lower_bound, &self.upper_bound)
    }
}

/// `\int f \, dx` or `\int_{a}^{b} f \, dx` with the expression as plain text
pub fn integral_latex(expression: &str, kind: IntegralKind, lower: &str, upper: &str) -> String {
    match kind {
        IntegralKind::Indefinite => format!("\\int \\text{{{}}} \\, dx", expression),
        IntegralKind::Definite => format!(
            "\\int_{{{}}}^{{{}}} \\text{{{}}} \\, dx",
            lower, upper, expression
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_indefinite_request_body() {
        let request =
            CalculationRequest::new("x^2", IntegralKind::Indefinite, "", "", "-10,10").unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "function": "x^2",
                "type": "indefinite",
                "lower_limit": "",
                "upper_limit": "",
                "graph_range": "-10,10"
            })
        );
    }

    #[test]
    fn test_definite_request_body() {
        let request =
            CalculationRequest::new(" sin(x) ", IntegralKind::Definite, " 0", "pi ", "-5,5")
                .unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["function"], "sin(x)");
        assert_eq!(body["type"], "definite");
        assert_eq!(body["lower_limit"], "0");
        assert_eq!(body["upper_limit"], "pi");
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            CalculationRequest::new("   ", IntegralKind::Indefinite, "", "", "-10,10"),
            Err(ValidationError::EmptyExpression)
        );
        assert_eq!(
            CalculationRequest::new("x", IntegralKind::Definite, "0", "", "-10,10"),
            Err(ValidationError::MissingBounds)
        );
        assert_eq!(
            CalculationRequest::new("x", IntegralKind::Definite, " ", "1", "-10,10"),
            Err(ValidationError::MissingBounds)
        );
    }

    #[test]
    fn test_indefinite_drops_stale_bounds() {
        let request =
            CalculationRequest::new("x", IntegralKind::Indefinite, "0", "1", "-10,10").unwrap();
        assert!(request.lower_bound.is_empty());
        assert!(request.upper_bound.is_empty());
    }

    #[test]
    fn test_integral_latex() {
        assert_eq!(
            integral_latex("x^2", IntegralKind::Indefinite, "", ""),
            "\\int \\text{x^2} \\, dx"
        );
        assert_eq!(
            integral_latex("x", IntegralKind::Definite, "0", "1"),
            "\\int_{0}^{1} \\text{x} \\, dx"
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(
            "definite".parse::<IntegralKind>(),
            Ok(IntegralKind::Definite)
        );
        assert!("double".parse::<IntegralKind>().is_err());
        assert_eq!(IntegralKind::Definite.toggled(), IntegralKind::Indefinite);
    }
}
