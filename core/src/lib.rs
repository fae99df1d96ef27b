//! # Integra Core
//!
//! Core library for Integra - a terminal client for a symbolic integral
//! calculation service.
//!
//! The library owns everything on the client side of the `/calculate`
//! endpoint: the focus-tracked input router driven by a virtual keypad,
//! request validation, the HTTP client, the result presenter with its chart
//! adapter and math typesetter, and the persisted calculation history.
//! The mathematics itself is computed by the remote service.

// Core modules
pub mod calc;
pub mod chart;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod present;
pub mod session;

// Re-export commonly used types
pub use calc::{
    CalculationRequest, CalculationResponse, CalculatorClient, HttpCalculatorClient, IntegralKind,
    PlotData,
};
pub use config::ResolvedClientConfig;
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryStore, JsonFileHistoryStore, MemoryHistoryStore};
pub use input::{FieldRef, FocusTracker, InputRouter, Keypad};
pub use present::{RegionView, ResultPresenter};
pub use session::{CalculatorSession, SolveOutcome, UiPhase};

/// Current version of the integra-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
