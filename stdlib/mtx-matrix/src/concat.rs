//! Row-wise and column-wise concatenation.

use std::cell::Ref;

use mtx_host::{ForeignObject, ForeignRef, Host, HostError, Value};

use crate::error::{Axis, MatrixError, MatrixResult};
use crate::matrix::{slot_buffer, Matrix};

impl Matrix {
    /// Stacks `parts` vertically.
    ///
    /// All parts must have the column count of the first. Returns `None`
    /// when `parts` is empty.
    pub fn concat_rows(parts: &[&Matrix]) -> MatrixResult<Option<Matrix>> {
        let Some(first) = parts.first() else {
            return Ok(None);
        };
        let cols = first.cols();
        let mut rows = 0;
        for part in parts {
            if part.cols() != cols {
                return Err(MatrixError::DimensionMismatch {
                    axis: Axis::Col,
                    expected: cols,
                    actual: part.cols(),
                });
            }
            rows = grow(rows, part.rows(), (rows, cols))?;
        }

        let mut elements = slot_buffer(rows, cols)?;
        for part in parts {
            elements.extend_from_slice(part.as_slice());
        }
        Matrix::from_flat(rows, cols, elements).map(Some)
    }

    /// Places `parts` side by side.
    ///
    /// All parts must have the row count of the first. Each part becomes a
    /// contiguous block of columns, in argument order. Returns `None` when
    /// `parts` is empty.
    pub fn concat_cols(parts: &[&Matrix]) -> MatrixResult<Option<Matrix>> {
        let Some(first) = parts.first() else {
            return Ok(None);
        };
        let rows = first.rows();
        let mut cols = 0;
        for part in parts {
            if part.rows() != rows {
                return Err(MatrixError::DimensionMismatch {
                    axis: Axis::Row,
                    expected: rows,
                    actual: part.rows(),
                });
            }
            cols = grow(cols, part.cols(), (rows, cols))?;
        }

        let mut elements = slot_buffer(rows, cols)?;
        for r in 0..rows {
            for part in parts {
                if let Some(row) = part.row(r) {
                    elements.extend_from_slice(row);
                }
            }
        }
        Matrix::from_flat(rows, cols, elements).map(Some)
    }
}

fn grow(total: usize, extra: usize, (rows, cols): (usize, usize)) -> MatrixResult<usize> {
    total
        .checked_add(extra)
        .ok_or(MatrixError::TooLarge { rows, cols })
}

fn extent(matrix: &Matrix, axis: Axis) -> usize {
    match axis {
        Axis::Row => matrix.rows(),
        Axis::Col => matrix.cols(),
    }
}

/// Borrows every argument as a matrix and hands the slice to `combine`.
///
/// Arguments are checked one at a time in order: each must be a foreign
/// object, then a matrix, then have the same extent along `shared` as the
/// first. The first failure is reported.
pub(crate) fn with_matrices<R>(
    args: &[Value],
    host: &dyn Host,
    shared: Axis,
    combine: impl FnOnce(&[&Matrix]) -> MatrixResult<R>,
) -> MatrixResult<R> {
    let mut objects: Vec<ForeignRef> = Vec::with_capacity(args.len());
    let mut expected = None;
    for arg in args {
        if arg.as_foreign().is_none() {
            return Err(MatrixError::TypeMismatch);
        }
        let object = host.foreign_object(arg)?;
        {
            let borrowed = borrow(&object)?;
            let matrix = borrowed
                .as_any()
                .downcast_ref::<Matrix>()
                .ok_or(MatrixError::TypeMismatch)?;
            let actual = extent(matrix, shared);
            match expected {
                None => expected = Some(actual),
                Some(expected) if expected != actual => {
                    return Err(MatrixError::DimensionMismatch {
                        axis: shared,
                        expected,
                        actual,
                    });
                }
                Some(_) => {}
            }
        }
        objects.push(object);
    }

    let borrows = objects.iter().map(borrow).collect::<Result<Vec<_>, _>>()?;
    let matrices = borrows
        .iter()
        .map(|object| {
            object
                .as_any()
                .downcast_ref::<Matrix>()
                .ok_or(MatrixError::TypeMismatch)
        })
        .collect::<MatrixResult<Vec<&Matrix>>>()?;
    combine(&matrices)
}

fn borrow(object: &ForeignRef) -> Result<Ref<'_, dyn ForeignObject + 'static>, HostError> {
    object
        .try_borrow()
        .map_err(|_| HostError::internal("matrix is already in use"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_rts::Runtime;

    fn ints(rows: usize, cols: usize, values: &[i64]) -> Matrix {
        Matrix::from_flat(rows, cols, values.iter().copied().map(Value::integer).collect()).unwrap()
    }

    #[test]
    fn test_concat_rows() {
        let a = ints(2, 3, &[1, 2, 3, 4, 5, 6]);
        let b = ints(1, 3, &[7, 8, 9]);
        let c = Matrix::concat_rows(&[&a, &b]).unwrap().unwrap();
        assert_eq!(c, ints(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]));
    }

    #[test]
    fn test_concat_rows_mismatch() {
        let a = ints(1, 3, &[0; 3]);
        let b = ints(1, 2, &[0; 2]);
        let c = ints(1, 3, &[0; 3]);
        let err = Matrix::concat_rows(&[&a, &c, &b]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                axis: Axis::Col,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_concat_cols_blocks() {
        let a = ints(2, 1, &[1, 2]);
        let b = ints(2, 2, &[3, 4, 5, 6]);
        let c = Matrix::concat_cols(&[&a, &b]).unwrap().unwrap();
        assert_eq!(c, ints(2, 3, &[1, 3, 4, 2, 5, 6]));
    }

    #[test]
    fn test_concat_cols_mismatch() {
        let a = ints(2, 1, &[0; 2]);
        let b = ints(3, 1, &[0; 3]);
        let err = Matrix::concat_cols(&[&a, &b]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected matrix with 2 row(s), but got one with 3 row(s) instead."
        );
    }

    #[test]
    fn test_concat_extent_overflow() {
        let wide = Matrix::from_flat(0, usize::MAX / 2 + 1, Vec::new()).unwrap();
        let err = Matrix::concat_cols(&[&wide, &wide]).unwrap_err();
        assert!(matches!(err, MatrixError::TooLarge { rows: 0, .. }));

        let tall = Matrix::from_flat(usize::MAX, 0, Vec::new()).unwrap();
        let err = Matrix::concat_rows(&[&tall, &tall]).unwrap_err();
        assert!(matches!(err, MatrixError::TooLarge { cols: 0, .. }));
    }

    #[test]
    fn test_arguments_checked_in_order() {
        let mut rt = Runtime::new();
        let a = ints(1, 3, &[0; 3]).into_value(&mut rt);
        let b = ints(1, 2, &[0; 2]).into_value(&mut rt);

        let err = with_matrices(&[a.clone(), b.clone(), Value::integer(5)], &rt, Axis::Col, |_| Ok(()))
            .unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                axis: Axis::Col,
                expected: 3,
                actual: 2,
            }
        );

        let err = with_matrices(&[a.clone(), Value::integer(5), b], &rt, Axis::Col, |_| Ok(()))
            .unwrap_err();
        assert_eq!(err, MatrixError::TypeMismatch);

        let shape = with_matrices(&[a.clone(), a], &rt, Axis::Col, |parts| Ok(parts.len())).unwrap();
        assert_eq!(shape, 2);
    }

    #[test]
    fn test_concat_empty() {
        assert_eq!(Matrix::concat_rows(&[]).unwrap(), None);
        assert_eq!(Matrix::concat_cols(&[]).unwrap(), None);
    }

    #[test]
    fn test_concat_single_is_copy() {
        let a = ints(2, 2, &[1, 2, 3, 4]);
        assert_eq!(Matrix::concat_rows(&[&a]).unwrap(), Some(a.clone()));
        assert_eq!(Matrix::concat_cols(&[&a]).unwrap(), Some(a));
    }
}
