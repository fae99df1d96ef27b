//! Recent integrals panel

use crate::interactive::text_utils::{text_width, truncate_to_width};
use integra_core::present::MathTypesetter;
use integra_core::HistoryEntry;
use iocraft::prelude::*;

/// One row of the panel: typeset integral and a short date
pub fn history_row(
    entry: &HistoryEntry,
    typesetter: &dyn MathTypesetter,
    width: usize,
) -> String {
    let markup = entry.latex();
    let rendered = typesetter.typeset(&markup).unwrap_or(markup);
    let date = entry
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%d/%m %H:%M")
        .to_string();
    // Date plus the gap before it
    let room = width.saturating_sub(date.len() + 2);
    let shown = truncate_to_width(&rendered, room);
    let pad = room.saturating_sub(text_width(&shown));
    format!("{}{}  {}", shown, " ".repeat(pad), date)
}

#[derive(Default, Props)]
pub struct HistoryPanelProps {
    /// Rows already laid out, most recent first
    pub rows: Vec<String>,
    pub selected: usize,
}

#[component]
pub fn HistoryPanel(props: &HistoryPanelProps) -> impl Into<AnyElement<'static>> {
    let accent = Color::Rgb {
        r: 79,
        g: 70,
        b: 229,
    };

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: accent,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: "Recent integrals  (↑/↓ select · enter restore · esc close)", color: Color::DarkGrey)
            #(if props.rows.is_empty() {
                Some(element! {
                    View {
                        Text(content: "No recent integrals.", color: Color::DarkGrey)
                    }
                })
            } else {
                None
            })
            #(props.rows.iter().enumerate().map(|(i, row)| {
                let (background, color) = if i == props.selected {
                    (Some(accent), Color::White)
                } else {
                    (None, Color::Grey)
                };
                element! {
                    View(key: i, background_color: background) {
                        Text(content: row.clone(), color: color)
                    }
                }
            }))
        }
    }
}
