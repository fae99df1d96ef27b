//! Routes keypad presses to the focused field

use super::field::{FieldRef, TextField};
use super::focus::FocusTracker;
use tracing::trace;

/// The three editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub expression: TextField,
    pub lower_bound: TextField,
    pub upper_bound: TextField,
}

impl FieldSet {
    pub fn get(&self, field: FieldRef) -> &TextField {
        match field {
            FieldRef::Expression => &self.expression,
            FieldRef::LowerBound => &self.lower_bound,
            FieldRef::UpperBound => &self.upper_bound,
        }
    }

    pub fn get_mut(&mut self, field: FieldRef) -> &mut TextField {
        match field {
            FieldRef::Expression => &mut self.expression,
            FieldRef::LowerBound => &mut self.lower_bound,
            FieldRef::UpperBound => &mut self.upper_bound,
        }
    }
}

/// Input router owning the fields and the focus tracker
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    fields: FieldSet,
    focus: FocusTracker,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn field(&self, field: FieldRef) -> &TextField {
        self.fields.get(field)
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    /// The field keypad presses go to
    pub fn current_field(&self) -> FieldRef {
        self.focus.current_field()
    }

    /// Focus event on `field`
    pub fn on_focus(&mut self, field: FieldRef) {
        trace!(%field, "field focused");
        self.focus.on_focus(field);
    }

    pub fn blur(&mut self) {
        self.focus.blur();
    }

    /// Move focus to the next/previous field among `available`
    pub fn cycle_focus(&mut self, available: &[FieldRef], forward: bool) {
        if let Some(field) = self.focus.cycle(available, forward) {
            self.on_focus(field);
        }
    }

    /// Insert `value` into the active field at its selection.
    ///
    /// Returns false for an empty value, which leaves everything untouched.
    pub fn press_key(&mut self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let active = self.focus.current_field();
        self.fields.get_mut(active).insert(value);
        self.focus.restore();
        true
    }

    /// Backspace in the active field
    pub fn backspace(&mut self) -> bool {
        let active = self.focus.current_field();
        let removed = self.fields.get_mut(active).backspace();
        self.focus.restore();
        removed
    }

    /// Forward delete in the active field
    pub fn delete_forward(&mut self) -> bool {
        let active = self.focus.current_field();
        let removed = self.fields.get_mut(active).delete_forward();
        self.focus.restore();
        removed
    }

    /// Cursor and selection editing on the active field
    pub fn edit_active(&mut self, edit: impl FnOnce(&mut TextField)) {
        let active = self.focus.current_field();
        edit(self.fields.get_mut(active));
        self.focus.restore();
    }

    /// Replace the value of `field`
    pub fn set_value(&mut self, field: FieldRef, value: impl Into<String>) {
        self.fields.get_mut(field).set_value(value);
    }

    /// Empty every field and focus the expression
    pub fn clear(&mut self) {
        for field in FieldRef::ALL {
            self.fields.get_mut(field).clear();
        }
        self.on_focus(FieldRef::Expression);
    }
}
