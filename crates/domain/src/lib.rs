//! Domain layer for Tool Monkey
//!
//! Describes failure scenarios, the closed taxonomy of injectable errors and
//! the records produced for every tool call. Pure data: no clocks beyond
//! event timestamps, no I/O.

pub mod entities;
pub mod errors;
pub mod injected_error;
pub mod scenarios;
pub mod value_objects;

pub use entities::*;
pub use errors::ConfigurationError;
pub use injected_error::InjectedError;
pub use value_objects::*;
