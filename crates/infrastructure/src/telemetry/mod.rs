//! Logging setup for chaos runs
//!
//! Console output through `tracing-subscriber`, filtered by `RUST_LOG` or the
//! configured filter string.

mod logging;

pub use logging::{LogFormat, TelemetryConfig, TelemetryError, build_filter, init_logging};
