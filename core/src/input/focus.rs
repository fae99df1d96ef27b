//! Tracking of the field the keypad writes into

use super::field::FieldRef;

/// Remembers the last focused field.
///
/// The active field survives a blur: when another panel takes the keyboard
/// the keypad still targets the field the user was last editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTracker {
    active: FieldRef,
    focused: bool,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self {
            active: FieldRef::Expression,
            focused: true,
        }
    }

    /// The field that keypad presses are routed to
    pub fn current_field(&self) -> FieldRef {
        self.active
    }

    /// Whether the active field currently holds the keyboard
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Record a focus event on `field`
    pub fn on_focus(&mut self, field: FieldRef) {
        self.active = field;
        self.focused = true;
    }

    /// Give the keyboard to something other than a field
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Hand focus back to the active field
    pub fn restore(&mut self) {
        self.focused = true;
    }

    /// Field after (or before) the active one among `available`.
    ///
    /// Falls back to the first available field when the active one is not
    /// in the list.
    pub fn cycle(&self, available: &[FieldRef], forward: bool) -> Option<FieldRef> {
        if available.is_empty() {
            return None;
        }
        let next = match available.iter().position(|f| *f == self.active) {
            Some(i) if forward => (i + 1) % available.len(),
            Some(i) => (i + available.len() - 1) % available.len(),
            None => 0,
        };
        Some(available[next])
    }
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self::new()
    }
}
