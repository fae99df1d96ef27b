//! Focus-tracked text input driven by a virtual keypad

pub mod field;
pub mod focus;
pub mod keypad;
pub mod router;

pub use field::{FieldRef, TextField};
pub use focus::FocusTracker;
pub use keypad::{Key, KeyAction, Keypad};
pub use router::{FieldSet, InputRouter};
