//! Virtual keypad display

use integra_core::input::{Key, KeyAction, Keypad};
use iocraft::prelude::*;

const KEY_WIDTH: u16 = 12;

/// Keyboard hint printed next to a key label
pub fn key_hint(key: &Key) -> String {
    match (key.action, key.shortcut) {
        (_, Some(c)) => format!("M-{}", c),
        (KeyAction::Backspace, None) => "bksp".to_string(),
        (KeyAction::Clear, None) => "C-l".to_string(),
        (KeyAction::Solve, None) => "enter".to_string(),
        (KeyAction::Insert(_), None) => String::new(),
    }
}

#[derive(Default, Props)]
pub struct KeypadPanelProps {
    pub keypad: Keypad,
    /// Dim the keys while a request is out
    pub disabled: bool,
}

#[component]
pub fn KeypadPanel(props: &KeypadPanelProps) -> impl Into<AnyElement<'static>> {
    let label_color = if props.disabled {
        Color::DarkGrey
    } else {
        Color::White
    };

    element! {
        View(flex_direction: FlexDirection::Column) {
            #(props.keypad.rows().iter().enumerate().map(|(row_index, row)| element! {
                View(key: row_index, flex_direction: FlexDirection::Row) {
                    #(row.iter().map(|key| {
                        let accent = match key.action {
                            KeyAction::Solve => Color::Rgb { r: 79, g: 70, b: 229 },
                            KeyAction::Clear | KeyAction::Backspace => Color::Rgb { r: 244, g: 63, b: 94 },
                            KeyAction::Insert(_) => Color::Rgb { r: 51, g: 65, b: 85 },
                        };
                        element! {
                            View(
                                key: key.label,
                                width: KEY_WIDTH,
                                border_style: BorderStyle::Round,
                                border_color: accent,
                                justify_content: JustifyContent::SpaceBetween,
                                padding_left: 1,
                                padding_right: 1,
                            ) {
                                Text(content: key.label, color: label_color, weight: Weight::Bold)
                                Text(content: key_hint(key), color: Color::DarkGrey)
                            }
                        }
                    }))
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_hints() {
        let keypad = Keypad::standard();
        let sin = keypad.by_label("sin").unwrap();
        assert_eq!(key_hint(sin), "M-s");
        assert_eq!(key_hint(keypad.by_label("=").unwrap()), "enter");
        assert_eq!(key_hint(keypad.by_label("C").unwrap()), "C-l");
        assert_eq!(key_hint(keypad.by_label("⌫").unwrap()), "bksp");
    }

    #[test]
    fn test_hints_fit_in_keys() {
        let keypad = Keypad::standard();
        for key in keypad.keys() {
            let width = crate::interactive::text_utils::text_width(key.label)
                + 1
                + key_hint(key).len();
            assert!(width <= (KEY_WIDTH - 4) as usize, "{} does not fit", key.label);
        }
    }
}
