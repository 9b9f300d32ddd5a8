//! Host runtime interface for mtx extensions.
//!
//! An extension (such as `mtx-matrix`) is loaded into a managed,
//! garbage-collected scripting runtime. It never sees the runtime itself,
//! only the narrow interface defined here:
//!
//! - [`Value`] and [`Number`]: the host's polymorphic value representation
//! - [`Evaluator`]: the arithmetic evaluator extensions delegate to
//! - [`Host`]: number factories, size coercion, display conversion and
//!   foreign-object registration
//! - [`ForeignObject`]: the protocol an extension type implements to become
//!   script-visible and collector-traceable
//! - [`Extension`]: the load-time manifest and symbol lookup
//! - [`HostError`]: failure reporting
//!
//! # Ownership
//!
//! ```text
//! +--------------------------- host runtime ---------------------------+
//! |  globals, stack  ---->  Value::Foreign(id)  ---->  foreign heap     |
//! |                                                    |               |
//! |                            Rc<RefCell<dyn ForeignObject>>           |
//! |                                                    |               |
//! |                         trace() reports the Values it references   |
//! +--------------------------------------------------------------------+
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod eval;
pub mod foreign;
pub mod host;
pub mod value;

pub use error::{ErrorCode, HostError, HostResult};
pub use eval::{Evaluator, Instruction, Opcode};
pub use foreign::{ForeignObject, ForeignRef, Getter, MemberTable, Method};
pub use host::{expect_args, Extension, Host, NativeFn};
pub use value::{ForeignId, Number, Value};
