//! Chart adapter and renderers for plot samples returned by the service

pub mod adapter;
pub mod figure;
pub mod render;

pub use adapter::ChartAdapter;
pub use figure::{Figure, Layout, Trace, TraceRole};
pub use render::{ChartRenderer, PlotlyHtmlRenderer, TextPlot};
