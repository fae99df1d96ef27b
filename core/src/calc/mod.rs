//! Wire types and client for the remote calculation service

pub mod client;
pub mod request;
pub mod response;

pub use client::{CalculatorClient, HttpCalculatorClient};
pub use request::{integral_latex, CalculationRequest, IntegralKind};
pub use response::{CalculationResponse, PlotData};
