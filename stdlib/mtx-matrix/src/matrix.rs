//! The dense matrix container.
//!
//! # Overview
//!
//! `Matrix` is a 2-D row-major array of host values. It never looks at
//! what kind of number an element is: it copies elements, hands them to the
//! host evaluator (see [`crate::arith`]) and reports them to the collector
//! (see [`Matrix::trace`]).
//!
//! Script-facing indices are 1-based and always validated. Internally the
//! only address computation is [`Matrix::offset`].

use std::fmt;

use mtx_host::{Host, Value};

use crate::error::{Axis, MatrixError, MatrixResult};

// ============================================================
// Core Matrix Type
// ============================================================

/// A 2-D row-major matrix of host values.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    elements: Vec<Value>,
}

impl Matrix {
    /// Get the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get the total number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the matrix has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get a slice view of the elements (row-major)
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    /// Get a row as a slice (0-based)
    pub fn row(&self, row: usize) -> Option<&[Value]> {
        if row < self.rows {
            let start = self.offset(row, 0);
            Some(&self.elements[start..start + self.cols])
        } else {
            None
        }
    }

    /// Convert a 0-based (row, col) to a flat index
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Element at a 0-based position the caller has already validated.
    pub(crate) fn at(&self, row: usize, col: usize) -> &Value {
        &self.elements[self.offset(row, col)]
    }
}

// ============================================================
// Construction
// ============================================================

/// Number of slots in a `rows x cols` matrix.
fn slot_count(rows: usize, cols: usize) -> MatrixResult<usize> {
    rows.checked_mul(cols)
        .ok_or(MatrixError::TooLarge { rows, cols })
}

/// An empty buffer with room for exactly `rows * cols` elements.
pub(crate) fn slot_buffer(rows: usize, cols: usize) -> MatrixResult<Vec<Value>> {
    let len = slot_count(rows, cols)?;
    let mut elements = Vec::new();
    elements
        .try_reserve_exact(len)
        .map_err(|_| MatrixError::TooLarge { rows, cols })?;
    Ok(elements)
}

impl Matrix {
    /// Create a matrix from row-major values.
    ///
    /// `values` must hold exactly `rows * cols` elements.
    pub fn from_flat(rows: usize, cols: usize, values: Vec<Value>) -> MatrixResult<Self> {
        let expected = slot_count(rows, cols)?;
        if values.len() != expected {
            return Err(MatrixError::ElementCount {
                rows,
                cols,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            elements: values,
        })
    }

    /// Create a `rows x cols` matrix of the host's integer zero.
    pub fn zeros<H: Host + ?Sized>(rows: usize, cols: usize, host: &mut H) -> MatrixResult<Self> {
        let mut elements = slot_buffer(rows, cols)?;
        let zero = host.integer(0);
        elements.resize(rows * cols, zero);
        Ok(Self {
            rows,
            cols,
            elements,
        })
    }

    /// Create an `n x n` identity matrix of host integers.
    pub fn identity<H: Host + ?Sized>(n: usize, host: &mut H) -> MatrixResult<Self> {
        let mut m = Self::zeros(n, n, host)?;
        let one = host.integer(1);
        for i in 0..n {
            let idx = m.offset(i, i);
            m.elements[idx] = one.clone();
        }
        Ok(m)
    }

    /// Create a `1 x n` row vector.
    pub fn row_vector(values: Vec<Value>) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            elements: values,
        }
    }

    /// Create an `n x 1` column vector.
    pub fn column_vector(values: Vec<Value>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            elements: values,
        }
    }
}

// ============================================================
// Indexed Access (1-based)
// ============================================================

impl Matrix {
    fn validate_index(&self, row: usize, col: usize) -> MatrixResult<()> {
        if row < 1 || row > self.rows {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Row,
                index: row,
                bound: self.rows,
            });
        }
        if col < 1 || col > self.cols {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Col,
                index: col,
                bound: self.cols,
            });
        }
        Ok(())
    }

    /// Get the element at a 1-based (row, col).
    pub fn get(&self, row: usize, col: usize) -> MatrixResult<&Value> {
        self.validate_index(row, col)?;
        Ok(self.at(row - 1, col - 1))
    }

    /// Replace the element at a 1-based (row, col), returning the new value.
    ///
    /// Nothing changes if the index is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: Value) -> MatrixResult<Value> {
        self.validate_index(row, col)?;
        let idx = self.offset(row - 1, col - 1);
        self.elements[idx] = value.clone();
        Ok(value)
    }
}

// ============================================================
// Collector Support
// ============================================================

impl Matrix {
    /// Append every stored element, in storage order, to `sink`.
    pub fn trace(&self, sink: &mut Vec<Value>) {
        sink.extend(self.elements.iter().cloned());
    }

    /// Short description, e.g. `2 x 3 matrix`.
    pub fn describe(&self) -> String {
        format!("{} x {} matrix", self.rows, self.cols)
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix({}x{}, {:?})", self.rows, self.cols, self.elements)
    }
}

// ============================================================
// Tests
// ============================================================
