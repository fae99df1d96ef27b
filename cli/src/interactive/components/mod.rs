//! UI components for interactive mode

pub mod history_panel;
pub mod input_panel;
pub mod keypad_panel;
pub mod result_panel;
pub mod status_line;

pub use history_panel::HistoryPanel;
pub use input_panel::FieldInput;
pub use keypad_panel::KeypadPanel;
pub use result_panel::ResultPanel;
pub use status_line::{StatusLine, StatusLineContext};
