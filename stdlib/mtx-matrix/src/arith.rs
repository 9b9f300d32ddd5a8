//! Matrix arithmetic delegated to the host evaluator.
//!
//! Every scalar step goes through [`Evaluator::apply`], so the element
//! semantics (exact rationals, float promotion, errors on non-numbers) are
//! whatever the host defines. The routines here only check shapes and
//! decide which pairs of elements meet.

use mtx_host::{Evaluator, Opcode, Value};

use crate::error::{Axis, MatrixError, MatrixResult};
use crate::matrix::{slot_buffer, Matrix};

impl Matrix {
    /// Fails unless `operand` has exactly this matrix's shape.
    ///
    /// Rows are compared before columns.
    pub fn require_same_shape(&self, operand: &Matrix) -> MatrixResult<()> {
        if operand.rows() != self.rows() {
            return Err(MatrixError::DimensionMismatch {
                axis: Axis::Row,
                expected: self.rows(),
                actual: operand.rows(),
            });
        }
        if operand.cols() != self.cols() {
            return Err(MatrixError::DimensionMismatch {
                axis: Axis::Col,
                expected: self.cols(),
                actual: operand.cols(),
            });
        }
        Ok(())
    }

    fn elementwise<E>(&self, op: Opcode, operand: &Matrix, evaluator: &mut E) -> MatrixResult<Matrix>
    where
        E: Evaluator + ?Sized,
    {
        self.require_same_shape(operand)?;
        let elements = self
            .as_slice()
            .iter()
            .zip(operand.as_slice())
            .map(|(lhs, rhs)| evaluator.apply(op, lhs.clone(), rhs.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Matrix::from_flat(self.rows(), self.cols(), elements)
    }

    /// Element-wise sum.
    pub fn add<E: Evaluator + ?Sized>(&self, operand: &Matrix, evaluator: &mut E) -> MatrixResult<Matrix> {
        self.elementwise(Opcode::Add, operand, evaluator)
    }

    /// Element-wise difference.
    pub fn subtract<E: Evaluator + ?Sized>(
        &self,
        operand: &Matrix,
        evaluator: &mut E,
    ) -> MatrixResult<Matrix> {
        self.elementwise(Opcode::Subtract, operand, evaluator)
    }

    /// Matrix product `self * operand`.
    ///
    /// Requires `self.cols() == operand.rows()`; the result is
    /// `self.rows() x operand.cols()`. Each slot is the left fold
    /// `((p0 + p1) + p2) + ...` of the pairwise products, and the host's
    /// zero when the inner dimension is empty.
    pub fn multiply<E: Evaluator + ?Sized>(
        &self,
        operand: &Matrix,
        evaluator: &mut E,
    ) -> MatrixResult<Matrix> {
        if self.cols() != operand.rows() {
            return Err(MatrixError::DimensionMismatch {
                axis: Axis::Row,
                expected: self.cols(),
                actual: operand.rows(),
            });
        }

        let (rows, cols, common) = (self.rows(), operand.cols(), self.cols());
        let mut elements = slot_buffer(rows, cols)?;
        for i in 0..rows {
            for j in 0..cols {
                elements.push(dot(self, operand, i, j, common, evaluator)?);
            }
        }
        Matrix::from_flat(rows, cols, elements)
    }
}

/// Row `i` of `lhs` times column `j` of `rhs`.
fn dot<E: Evaluator + ?Sized>(
    lhs: &Matrix,
    rhs: &Matrix,
    i: usize,
    j: usize,
    common: usize,
    evaluator: &mut E,
) -> MatrixResult<Value> {
    let mut products = Vec::with_capacity(common);
    for k in 0..common {
        let p = evaluator.apply(Opcode::Multiply, lhs.at(i, k).clone(), rhs.at(k, j).clone())?;
        products.push(p);
    }

    let mut terms = products.into_iter();
    let Some(first) = terms.next() else {
        return Ok(evaluator.zero());
    };
    let mut acc = first;
    for term in terms {
        acc = evaluator.apply(Opcode::Add, acc, term)?;
    }
    Ok(acc)
}
