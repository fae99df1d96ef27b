//! Result presentation: typesetting, view models and the presenter

pub mod presenter;
pub mod typeset;
pub mod view_model;

pub use presenter::{ResultPresenter, CONNECTION_ERROR_MESSAGE, UNKNOWN_SERVER_ERROR_MESSAGE};
pub use typeset::{MathTypesetter, PlainTextTypesetter, RawTypesetter};
pub use view_model::{ErrorViewModel, RegionView, ResultsViewModel, StepView};
