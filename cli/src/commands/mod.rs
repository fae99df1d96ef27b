//! CLI command implementations

pub mod history;
pub mod interactive;
pub mod solve;

pub use history::{history_command, HistoryAction};
pub use interactive::interactive_command;
pub use solve::{solve_command, SolveArgs};
