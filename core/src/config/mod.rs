//! Minimal configuration module for Integra core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{
    parse_graph_range, ResolvedClientConfig, DEFAULT_ENDPOINT, DEFAULT_GRAPH_RANGE,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_SERVER_URL,
};
