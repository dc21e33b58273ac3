//! Core types for trace normalisation: the error taxonomy, scaling
//! parameters and row transform, run bookkeeping and CLI settings.

pub mod error;
pub mod models;
pub mod scaling;
pub mod settings;

pub use error::{Result, TraceError};
pub use scaling::ScaleConfig;
