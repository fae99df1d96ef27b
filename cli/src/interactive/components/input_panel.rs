//! Expression and bound inputs
//!
//! Each field is drawn as a bordered box with its text and a block cursor
//! laid over it. A selection replaces the cursor with a highlighted span.

use crate::interactive::text_utils::{char_width, text_width};
use integra_core::input::TextField;
use iocraft::prelude::*;
use std::cmp::min;

const ACCENT: Color = Color::Rgb {
    r: 34,
    g: 211,
    b: 238,
};
const MUTED: Color = Color::Rgb {
    r: 100,
    g: 116,
    b: 139,
};

/// Display position of the character at `char_pos`, with soft-wrapping.
///
/// Returns (display_line, display_column), both 0-based.
pub fn cursor_display_position(text: &str, char_pos: usize, max_width: usize) -> (usize, usize) {
    let mut display_line = 0usize;
    let mut current_line_width = 0usize;

    for ch in text.chars().take(char_pos) {
        let w = char_width(ch);
        // Wrap before a character that would overflow a non-empty line
        if max_width > 0 && current_line_width > 0 && current_line_width + w > max_width {
            display_line += 1;
            current_line_width = 0;
        }
        current_line_width += w;
    }

    (display_line, current_line_width)
}

/// Number of display lines `text` takes at `max_width`
pub fn display_line_count(text: &str, max_width: usize) -> usize {
    let (last_line, _) = cursor_display_position(text, text.chars().count(), max_width);
    last_line + 1
}

/// Where the overlay starts and the text it covers
fn overlay_span(field: &TextField) -> (usize, String) {
    let (start, end) = field.selection();
    if start != end {
        let selected: String = field.value().chars().skip(start).take(end - start).collect();
        return (start, selected);
    }

    let cursor = field.cursor();
    let under = field
        .value()
        .chars()
        .nth(cursor)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    (cursor, under)
}

#[derive(Default, Props)]
pub struct FieldInputProps {
    pub label: String,
    pub value: TextField,
    pub placeholder: String,
    pub focused: bool,
    /// Outer width of the box in cells
    pub width: u16,
}

/// A single labelled input box
#[component]
pub fn FieldInput(props: &FieldInputProps) -> impl Into<AnyElement<'static>> {
    // Border and padding take two cells on each side
    let inner_width = (props.width as usize).saturating_sub(4).max(1);
    let value = props.value.value().to_string();
    let show_placeholder = value.is_empty() && !props.focused;
    let lines = display_line_count(&value, inner_width) as u16;

    let border_color = if props.focused { ACCENT } else { MUTED };
    let label_weight = if props.focused {
        Weight::Bold
    } else {
        Weight::Normal
    };
    let (content, text_color) = if show_placeholder {
        (props.placeholder.clone(), MUTED)
    } else {
        (value.clone(), Color::White)
    };

    let overlay = if props.focused {
        let (start, text) = overlay_span(&props.value);
        let (line, col) = cursor_display_position(&value, start, inner_width);
        let left = min(col, inner_width.saturating_sub(1));
        let span = text_width(&text).clamp(1, inner_width - left);
        let background = if props.value.has_selection() {
            Color::Rgb {
                r: 79,
                g: 70,
                b: 229,
            }
        } else {
            Color::Rgb {
                r: 200,
                g: 200,
                b: 200,
            }
        };
        let foreground = if props.value.has_selection() {
            Color::White
        } else {
            Color::Rgb {
                r: 40,
                g: 40,
                b: 40,
            }
        };
        Some(element! {
            View(
                key: "cursor",
                position: Position::Absolute,
                top: line as u16,
                left: left as u16,
                width: span as u16,
                height: 1,
                background_color: background,
            ) {
                Text(content: text, color: foreground)
            }
        })
    } else {
        None
    };

    element! {
        View(flex_direction: FlexDirection::Column, margin_right: 1) {
            Text(
                content: props.label.clone(),
                color: border_color,
                weight: label_weight,
            )
            View(
                border_style: BorderStyle::Round,
                border_color: border_color,
                width: props.width,
                padding_left: 1,
                padding_right: 1,
            ) {
                View(position: Position::Relative, width: inner_width as u16, height: lines) {
                    Text(content: content, color: text_color)
                    #(overlay)
                }
            }
        }
    }
}
