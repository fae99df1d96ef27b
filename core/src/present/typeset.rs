//! Math typesetting for terminal display
//!
//! Markup from the service mixes prose with LaTeX wrapped in `\( \)` or
//! `\[ \]`. Markup without delimiters is treated as math throughout.

use crate::error::TypesetError;

/// Turns math markup into displayable text
pub trait MathTypesetter: Send + Sync {
    fn typeset(&self, markup: &str) -> Result<String, TypesetError>;
}

/// Renders LaTeX as Unicode plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextTypesetter;

impl MathTypesetter for PlainTextTypesetter {
    fn typeset(&self, markup: &str) -> Result<String, TypesetError> {
        let segments = split_math_segments(markup)?;
        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Math(math) => {
                    if !braces_balanced(math) {
                        return Err(TypesetError::UnbalancedBraces {
                            markup: markup.to_string(),
                        });
                    }
                    out.push_str(&LatexToText::new(math).convert());
                }
            }
        }
        Ok(collapse_spaces(&out))
    }
}

/// Passes markup through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTypesetter;

impl MathTypesetter for RawTypesetter {
    fn typeset(&self, markup: &str) -> Result<String, TypesetError> {
        Ok(markup.to_string())
    }
}

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    Math(&'a str),
}

fn split_math_segments(markup: &str) -> Result<Vec<Segment<'_>>, TypesetError> {
    let has_delimiters = markup.contains("\\(") || markup.contains("\\[");
    if !has_delimiters {
        return Ok(vec![Segment::Math(markup)]);
    }

    let mut segments = Vec::new();
    let mut rest = markup;
    loop {
        let open = ["\\(", "\\["]
            .iter()
            .filter_map(|d| rest.find(d).map(|i| (i, *d)))
            .min_by_key(|(i, _)| *i);

        let Some((start, open)) = open else {
            if !rest.is_empty() {
                segments.push(Segment::Text(rest));
            }
            break;
        };
        let close = if open == "\\(" { "\\)" } else { "\\]" };

        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }
        let inner = &rest[start + open.len()..];
        let Some(end) = inner.find(close) else {
            return Err(TypesetError::UnterminatedDelimiter {
                markup: markup.to_string(),
            });
        };
        segments.push(Segment::Math(&inner[..end]));
        rest = &inner[end + close.len()..];
    }
    Ok(segments)
}

fn braces_balanced(math: &str) -> bool {
    let mut depth: i64 = 0;
    let mut escaped = false;
    for c in math.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !last_space {
                out.push(c);
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out.trim()
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(" ,", ",")
        .replace(" .", ".")
}

fn symbol(command: &str) -> Option<&'static str> {
    let s = match command {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ε",
        "theta" => "θ",
        "lambda" => "λ",
        "mu" => "μ",
        "pi" => "π",
        "sigma" => "σ",
        "tau" => "τ",
        "phi" => "φ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Omega" => "Ω",
        "int" => "∫",
        "infty" => "∞",
        "cdot" => "·",
        "times" => "×",
        "pm" => "±",
        "leq" => "≤",
        "geq" => "≥",
        "neq" => "≠",
        "approx" => "≈",
        "to" => "→",
        "partial" => "∂",
        "quad" | "qquad" => " ",
        _ => return None,
    };
    Some(s)
}

fn superscript(c: char) -> Option<char> {
    let s = match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        'n' => 'ⁿ',
        'x' => 'ˣ',
        _ => return None,
    };
    Some(s)
}

fn subscript(c: char) -> Option<char> {
    let s = match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        _ => return None,
    };
    Some(s)
}

/// Whether `text` reads unambiguously without parentheses around it
fn is_atom(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || "⁰¹²³⁴⁵⁶⁷⁸⁹⁺⁻ⁿˣ".contains(c))
}

fn wrap(text: &str) -> String {
    if is_atom(text) {
        text.to_string()
    } else {
        format!("({})", text.trim())
    }
}

/// Recursive converter over one math segment
struct LatexToText {
    chars: Vec<char>,
    pos: usize,
}

impl LatexToText {
    fn new(math: &str) -> Self {
        Self {
            chars: math.chars().collect(),
            pos: 0,
        }
    }

    fn convert(mut self) -> String {
        self.parse_until(None)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }

    fn parse_until(&mut self, end: Option<char>) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if Some(c) == end {
                self.pos += 1;
                return out;
            }
            self.pos += 1;
            match c {
                '\\' => out.push_str(&self.command()),
                '{' => out.push_str(&self.parse_until(Some('}'))),
                '^' => out.push_str(&self.script(superscript, '^')),
                '_' => out.push_str(&self.script(subscript, '_')),
                other => out.push(other),
            }
        }
        out
    }

    /// Next argument: a braced group or a single token
    fn argument(&mut self) -> String {
        self.skip_spaces();
        match self.next() {
            Some('{') => self.parse_until(Some('}')),
            Some('\\') => self.command(),
            Some(c) => c.to_string(),
            None => String::new(),
        }
    }

    fn script(&mut self, map: fn(char) -> Option<char>, marker: char) -> String {
        let arg = self.argument();
        let mapped: Option<String> = arg.chars().map(map).collect();
        match mapped {
            Some(mapped) if !mapped.is_empty() => mapped,
            _ => format!("{}{}", marker, wrap(&arg)),
        }
    }

    fn command(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }

        if name.is_empty() {
            // Single-character commands such as \, \; \! \{ \}
            return match self.next() {
                Some(',') | Some(';') | Some(':') | Some(' ') => " ".to_string(),
                Some('!') => String::new(),
                Some(c) => c.to_string(),
                None => String::new(),
            };
        }

        match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let num = self.argument();
                let den = self.argument();
                format!("{}/{}", wrap(&num), wrap(&den))
            }
            "sqrt" => {
                let index = if self.peek() == Some('[') {
                    self.pos += 1;
                    self.parse_until(Some(']'))
                } else {
                    String::new()
                };
                let radicand = self.argument();
                let root = match index.as_str() {
                    "" | "2" => "√",
                    "3" => "∛",
                    "4" => "∜",
                    _ => return format!("({})^(1/{})", radicand.trim(), index),
                };
                format!("{}{}", root, wrap(&radicand))
            }
            "text" | "mathrm" | "operatorname" | "mathit" | "mathbf" => self.argument(),
            "left" | "right" | "big" | "Big" | "bigl" | "bigr" => String::new(),
            "log" | "ln" | "exp" | "sin" | "cos" | "tan" | "sec" | "csc" | "cot" | "sinh"
            | "cosh" | "tanh" | "arcsin" | "arccos" | "arctan" | "asin" | "acos" | "atan" => name,
            other => match symbol(other) {
                Some(s) => s.to_string(),
                None => other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markup: &str) -> String {
        PlainTextTypesetter.typeset(markup).unwrap()
    }

    #[test]
    fn test_fraction_and_power() {
        assert_eq!(render("\\frac{x^{3}}{3} + C"), "x³/3 + C");
        assert_eq!(render("\\frac{x^3}{3}+C"), "x³/3+C");
        assert_eq!(render("\\frac{x + 1}{2}"), "(x + 1)/2");
    }

    #[test]
    fn test_functions_and_delimiters() {
        assert_eq!(render("\\log{\\left(x \\right)} + C"), "log(x) + C");
        assert_eq!(render("- \\cos{\\left(x \\right)}"), "- cos(x)");
        assert_eq!(render("e^{x}"), "eˣ");
        assert_eq!(render("e^{2 x}"), "e^(2 x)");
    }

    #[test]
    fn test_step_with_prose() {
        let step = "1. Identify the integrand: \\( f(x) = x^{2} \\)";
        assert_eq!(render(step), "1. Identify the integrand: f(x) = x²");

        let step = "3. Substitute \\( u = \\sin{\\left(x \\right)} \\), \\( du = \\cos{\\left(x \\right)} \\, dx \\).";
        assert_eq!(render(step), "3. Substitute u = sin(x), du = cos(x) dx.");
    }

    #[test]
    fn test_display_math_and_symbols() {
        assert_eq!(
            render("\\[ \\int_{0}^{\\pi} \\sin{\\left(x \\right)} \\, dx \\]"),
            "∫₀^π sin(x) dx"
        );
        assert_eq!(render("\\sqrt{x} \\cdot 2"), "√x · 2");
        assert_eq!(render("\\sqrt[3]{x + 1}"), "∛(x + 1)");
        assert_eq!(render("\\text{x^2}"), "x²");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            PlainTextTypesetter.typeset("\\frac{x}{3"),
            Err(TypesetError::UnbalancedBraces { .. })
        ));
        assert!(matches!(
            PlainTextTypesetter.typeset("value \\( x^2"),
            Err(TypesetError::UnterminatedDelimiter { .. })
        ));
    }

    #[test]
    fn test_raw_typesetter() {
        assert_eq!(RawTypesetter.typeset("\\frac{1}{2}").unwrap(), "\\frac{1}{2}");
    }
}
