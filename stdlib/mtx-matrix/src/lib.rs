//! mtx Matrix Library
//!
//! Dense matrices whose elements are host values (exact rationals, floats,
//! or anything else the host calls a number), exposed to scripts as a
//! foreign object.
//!
//! # Architecture
//!
//! A [`Matrix`] is a flat row-major buffer of [`Value`](mtx_host::Value)s
//! plus its shape. It never computes on elements itself: every scalar step
//! of `+`, `-` and `*` is handed to the host's
//! [`Evaluator`](mtx_host::Evaluator), so whatever the host means by
//! arithmetic is preserved exactly.
//!
//! # What belongs here
//!
//! - The container, its constructors and 1-based checked access
//! - Shape checks and evaluator delegation for add, subtract, multiply
//! - Row-wise and column-wise concatenation
//! - Text rendering through the host's display conversion
//! - The [`ForeignObject`](mtx_host::ForeignObject) impl and the native
//!   function table ([`MatrixLibrary`])
//!
//! # What does NOT belong here
//!
//! - Number semantics (that's the host)
//! - Collection (the host calls [`Matrix::trace`])
//! - Linear algebra beyond the product (determinants, inverses, ...)
//!
//! # Script Surface
//!
//! | Name | Kind | Notes |
//! |------|------|-------|
//! | `mat`, `vec`, `vect`, `ident` | function | constructors |
//! | `concatRow`, `concatCol` | function | `nil` when called with no matrices |
//! | `rows`, `cols`, `size` | getter | |
//! | `get`, `set` | method | 1-based indices |
//! | `printStr` | method | bracketed, right-aligned columns |
//! | `+`, `-`, `*` | operator | operand must be a matrix |

#![warn(missing_docs)]

pub mod arith;
pub mod concat;
pub mod error;
pub mod library;
pub mod matrix;
pub mod object;
pub mod render;

pub use error::{Axis, MatrixError, MatrixResult, MATRIX_DIM_MISMATCH, MATRIX_TOO_LARGE};
pub use library::{MatrixLibrary, LIBRARY_NAME, MANIFEST, VERSION};
pub use matrix::Matrix;
pub use object::member_names;
pub use render::RenderConfig;
