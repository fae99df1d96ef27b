//! Terminal output for the one-shot commands
//!
//! Styling with `console`, a spinner from `indicatif` while a request is in
//! flight.

pub mod reporter;

pub use reporter::Reporter;
