//! Application layer - Observation of wrapped tool calls
//!
//! Defines the observer port the call wrapper reports through and the
//! in-memory observer that turns those reports into metrics.

pub mod ports;
pub mod services;

pub use ports::*;
pub use services::*;
