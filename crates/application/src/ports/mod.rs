//! Port definitions for application layer
//!
//! Ports are interfaces that define how the call wrapper reports to the
//! outside world. Services in this crate and adapters elsewhere implement them.

mod tool_call_observer;

pub use tool_call_observer::ToolCallObserver;
