//! Reference host runtime for mtx extensions.
//!
//! This crate implements the [`mtx_host::Host`] interface so extensions can
//! be loaded and driven end to end. It provides:
//!
//! - **Exact arithmetic**: rationals via `num-rational`, floats on demand
//! - **A stack-machine evaluator** for delegated arithmetic programs
//! - **A foreign heap** with a mark/sweep collector driven by
//!   [`ForeignObject::trace`](mtx_host::ForeignObject::trace)
//! - **Dispatch** of native functions, members and operators
//!
//! # Collection
//!
//! ```text
//!   roots (globals + caller-supplied values)
//!        |
//!        v
//!   mark: Foreign(id) -> object.trace() -> Foreign(child) -> ...
//!        |
//!        v
//!   sweep: drop every unmarked object
//! ```
//!
//! Collections run only at safe points: explicitly through
//! [`Runtime::collect`], or through [`Runtime::maybe_collect`] once
//! [`RuntimeConfig::gc_threshold`] allocations have happened.

#![warn(missing_docs)]

pub mod config;
pub mod heap;
pub mod number;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use heap::{ForeignHeap, GcStats};
pub use runtime::Runtime;
