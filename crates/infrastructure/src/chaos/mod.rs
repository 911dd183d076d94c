//! Scheduled failure injection for tool calls.
//!
//! The chaos module consists of:
//! - `InjectionEngine`: per-tool call counter that manufactures scheduled failures
//! - `ChaosTool`: call-lifecycle wrapper that reports to a `ToolCallObserver`
//! - `ChaosStats`: what an engine has injected so far
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use application::MonkeyObserver;
//! use domain::scenarios;
//! use infrastructure::chaos::with_monkey;
//!
//! let observer = Arc::new(MonkeyObserver::new());
//! let search = with_monkey(
//!     "search",
//!     scenarios::single_timeout(2.0)?,
//!     Some(observer.clone()),
//!     |query: &str| Ok::<_, String>(format!("results for {query}")),
//! );
//!
//! assert!(search.call("rust").is_err());
//! assert!(search.call("rust").is_ok());
//! println!("{}", observer.summary());
//! ```

mod chaos_stats;
mod chaos_tool;
mod injection_engine;

pub use chaos_stats::ChaosStats;
pub use chaos_tool::{CANCELLED_MESSAGE, ChaosTool, ToolCallError, with_monkey};
pub use injection_engine::{InjectionEngine, ScheduledCall};
