//! The native functions scripts call to build matrices.
//!
//! | Function            | Result                                 |
//! |---------------------|----------------------------------------|
//! | `mat(rows, cols)`   | `rows x cols` zero matrix              |
//! | `vec(v...)`         | `n x 1` column vector                  |
//! | `vect(v...)`        | `1 x n` row vector                     |
//! | `ident(n)`          | `n x n` identity                       |
//! | `concatRow(m...)`   | matrices stacked vertically, or `nil`  |
//! | `concatCol(m...)`   | matrices side by side, or `nil`        |

use mtx_host::{expect_args, Extension, Host, HostResult, NativeFn, Value};
use tracing::info;

use crate::concat::with_matrices;
use crate::error::Axis;
use crate::matrix::Matrix;

/// Names exported by the library, in load order.
pub const MANIFEST: &[&str] = &["mat", "vec", "vect", "ident", "concatRow", "concatCol"];

/// Library name reported to the host.
pub const LIBRARY_NAME: &str = "mtx-matrix";

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn mat(args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
    expect_args("mat", &args, 2)?;
    let rows = host.size(&args[0])?;
    let cols = host.size(&args[1])?;
    Ok(Matrix::zeros(rows, cols, host)?.into_value(host))
}

fn vec(args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
    Ok(Matrix::column_vector(args).into_value(host))
}

fn vect(args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
    Ok(Matrix::row_vector(args).into_value(host))
}

fn ident(args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
    expect_args("ident", &args, 1)?;
    let n = host.size(&args[0])?;
    Ok(Matrix::identity(n, host)?.into_value(host))
}

fn concat_row(args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
    let stacked = with_matrices(&args, host, Axis::Col, Matrix::concat_rows)?;
    Ok(stacked.map_or(Value::Nil, |m| m.into_value(host)))
}

fn concat_col(args: Vec<Value>, host: &mut dyn Host) -> HostResult<Value> {
    let joined = with_matrices(&args, host, Axis::Row, Matrix::concat_cols)?;
    Ok(joined.map_or(Value::Nil, |m| m.into_value(host)))
}

/// The matrix extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatrixLibrary;

impl Extension for MatrixLibrary {
    fn name(&self) -> &'static str {
        LIBRARY_NAME
    }

    fn manifest(&self) -> &'static [&'static str] {
        info!(library = LIBRARY_NAME, version = VERSION, "matrix library loaded");
        MANIFEST
    }

    fn resolve(&self, symbol: &str) -> Option<NativeFn> {
        let function: NativeFn = match symbol {
            "mat" => mat,
            "vec" => vec,
            "vect" => vect,
            "ident" => ident,
            "concatRow" => concat_row,
            "concatCol" => concat_col,
            _ => return None,
        };
        Some(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_resolves() {
        let library = MatrixLibrary;
        for &symbol in library.manifest() {
            assert!(library.resolve(symbol).is_some(), "{symbol} does not resolve");
        }
        assert!(library.resolve("determinant").is_none());
    }
}
