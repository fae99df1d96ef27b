//! Editable text fields with a character-based selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the editable inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRef {
    /// The function to integrate
    Expression,
    /// Lower integration bound
    LowerBound,
    /// Upper integration bound
    UpperBound,
}

impl FieldRef {
    /// All fields in tab order
    pub const ALL: [FieldRef; 3] = [
        FieldRef::Expression,
        FieldRef::LowerBound,
        FieldRef::UpperBound,
    ];

    /// Label shown next to the field
    pub fn label(&self) -> &'static str {
        match self {
            FieldRef::Expression => "f(x)",
            FieldRef::LowerBound => "a",
            FieldRef::UpperBound => "b",
        }
    }

    /// Whether the field only matters for definite integrals
    pub fn is_bound(&self) -> bool {
        matches!(self, FieldRef::LowerBound | FieldRef::UpperBound)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldRef::Expression => "expression",
            FieldRef::LowerBound => "lower bound",
            FieldRef::UpperBound => "upper bound",
        };
        f.write_str(name)
    }
}

/// Convert a character index into a byte offset, clamping to the end
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// A single-line text input.
///
/// Positions are character indices. The selection runs from `anchor` to
/// `cursor`; it is empty when both are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    anchor: usize,
    cursor: usize,
}

impl TextField {
    /// Create a field holding `value` with the cursor at the end
    pub fn new(value: impl Into<String>) -> Self {
        let mut field = Self::default();
        field.set_value(value);
        field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Number of characters in the field
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selection as an ordered `[start, end)` range
    pub fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Replace the whole value and put the cursor at the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let end = self.len();
        self.anchor = end;
        self.cursor = end;
    }

    /// Select `[start, end)`, clamped to the value
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len();
        self.anchor = start.min(len);
        self.cursor = end.min(len);
    }

    /// Move the cursor, optionally extending the selection
    pub fn set_cursor(&mut self, position: usize, extend: bool) {
        self.cursor = position.min(self.len());
        if !extend {
            self.anchor = self.cursor;
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            let (start, _) = self.selection();
            self.set_cursor(start, false);
        } else {
            self.set_cursor(self.cursor.saturating_sub(1), extend);
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            let (_, end) = self.selection();
            self.set_cursor(end, false);
        } else {
            self.set_cursor(self.cursor + 1, extend);
        }
    }

    pub fn move_home(&mut self, extend: bool) {
        self.set_cursor(0, extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.set_cursor(self.len(), extend);
    }

    pub fn select_all(&mut self) {
        self.set_selection(0, self.len());
    }

    /// Insert `text` over the current selection.
    ///
    /// The cursor ends immediately after the inserted text.
    pub fn insert(&mut self, text: &str) {
        let (start, end) = self.selection();
        let start_byte = byte_offset(&self.value, start);
        let end_byte = byte_offset(&self.value, end);
        self.value.replace_range(start_byte..end_byte, text);

        let cursor = start + text.chars().count();
        self.anchor = cursor;
        self.cursor = cursor;
    }

    /// Delete the selection, or the character before the cursor.
    ///
    /// Returns false when nothing was removed (empty selection at 0).
    pub fn backspace(&mut self) -> bool {
        let (start, end) = self.selection();
        let (from, to) = if start != end {
            (start, end)
        } else if start > 0 {
            (start - 1, start)
        } else {
            return false;
        };

        self.remove_range(from, to);
        true
    }

    /// Delete the selection, or the character after the cursor
    pub fn delete_forward(&mut self) -> bool {
        let (start, end) = self.selection();
        let (from, to) = if start != end {
            (start, end)
        } else if start < self.len() {
            (start, start + 1)
        } else {
            return false;
        };

        self.remove_range(from, to);
        true
    }

    pub fn clear(&mut self) {
        self.set_value(String::new());
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        let from_byte = byte_offset(&self.value, from);
        let to_byte = byte_offset(&self.value, to);
        self.value.replace_range(from_byte..to_byte, "");
        self.anchor = from;
        self.cursor = from;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut field = TextField::new("x^2");
        field.set_cursor(1, false);
        field.insert("*3");
        assert_eq!(field.value(), "x*3^2");
        assert_eq!(field.cursor(), 3);
        assert!(!field.has_selection());
    }

    #[test]
    fn test_insert_replaces_selection() {
        // T[0:s] + V + T[e:] with the cursor at s + len(V)
        let mut field = TextField::new("sin(x)+1");
        field.set_selection(4, 5);
        field.insert("2*x");
        assert_eq!(field.value(), "sin(2*x)+1");
        assert_eq!(field.cursor(), 7);
    }

    #[test]
    fn test_insert_multi_character_symbol_into_empty_field() {
        let mut field = TextField::default();
        field.insert("sqrt(");
        assert_eq!(field.value(), "sqrt(");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn test_insert_with_reversed_selection() {
        let mut field = TextField::new("abcdef");
        field.set_selection(4, 1);
        assert_eq!(field.selection(), (1, 4));
        field.insert("Z");
        assert_eq!(field.value(), "aZef");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_insert_unicode() {
        let mut field = TextField::new("2π");
        field.set_cursor(1, false);
        field.insert("·");
        assert_eq!(field.value(), "2·π");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut field = TextField::new("x");
        field.set_cursor(0, false);
        assert!(!field.backspace());
        assert_eq!(field.value(), "x");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_backspace_removes_previous_character() {
        let mut field = TextField::new("x^23");
        field.set_cursor(3, false);
        assert!(field.backspace());
        assert_eq!(field.value(), "x^3");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_backspace_removes_selection() {
        let mut field = TextField::new("exp(x)");
        field.set_selection(0, 4);
        assert!(field.backspace());
        assert_eq!(field.value(), "x)");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_delete_forward() {
        let mut field = TextField::new("ab");
        field.set_cursor(0, false);
        assert!(field.delete_forward());
        assert_eq!(field.value(), "b");
        field.move_end(false);
        assert!(!field.delete_forward());
    }

    #[test]
    fn test_cursor_movement_and_selection() {
        let mut field = TextField::new("cos(x)");
        field.move_home(false);
        field.move_right(true);
        field.move_right(true);
        assert_eq!(field.selection(), (0, 2));

        // Collapsing a selection moves to its edge
        field.move_left(false);
        assert_eq!(field.cursor(), 0);
        assert!(!field.has_selection());

        field.move_left(false);
        assert_eq!(field.cursor(), 0);

        field.select_all();
        assert_eq!(field.selection(), (0, 6));
        field.move_right(false);
        assert_eq!(field.cursor(), 6);
    }
}
