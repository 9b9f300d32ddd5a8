//! Property tests for mtx-matrix
//!
//! These tests check shape laws and element placement of the container
//! over integer matrices evaluated by the reference runtime.

use mtx_host::Value;
use mtx_matrix::Matrix;
use mtx_rts::Runtime;
use proptest::prelude::*;

fn int_matrix(max_dim: usize) -> impl Strategy<Value = Matrix> {
    (0..=max_dim, 0..=max_dim).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-50i64..50, rows * cols).prop_map(move |values| {
            let values = values.into_iter().map(Value::integer).collect();
            Matrix::from_flat(rows, cols, values).unwrap()
        })
    })
}

/// Two matrices of the same shape.
fn same_shape_pair() -> impl Strategy<Value = (Matrix, Matrix)> {
    (0..=4usize, 0..=4usize).prop_flat_map(|(rows, cols)| {
        let n = rows * cols;
        (
            prop::collection::vec(-50i64..50, n),
            prop::collection::vec(-50i64..50, n),
        )
            .prop_map(move |(a, b)| {
                let a = a.into_iter().map(Value::integer).collect();
                let b = b.into_iter().map(Value::integer).collect();
                (
                    Matrix::from_flat(rows, cols, a).unwrap(),
                    Matrix::from_flat(rows, cols, b).unwrap(),
                )
            })
    })
}

// ============================================================
// Arithmetic properties
// ============================================================

proptest! {
    #[test]
    fn add_is_commutative((a, b) in same_shape_pair()) {
        let mut rt = Runtime::new();
        let ab = a.add(&b, &mut rt).unwrap();
        let ba = b.add(&a, &mut rt).unwrap();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn subtract_undoes_add((a, b) in same_shape_pair()) {
        let mut rt = Runtime::new();
        let sum = a.add(&b, &mut rt).unwrap();
        let back = sum.subtract(&b, &mut rt).unwrap();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn identity_is_neutral(m in int_matrix(4)) {
        let mut rt = Runtime::new();
        let left = Matrix::identity(m.rows(), &mut rt).unwrap();
        let right = Matrix::identity(m.cols(), &mut rt).unwrap();
        prop_assert_eq!(left.multiply(&m, &mut rt).unwrap(), m.clone());
        prop_assert_eq!(m.multiply(&right, &mut rt).unwrap(), m);
    }

    #[test]
    fn product_shape(a in int_matrix(3), extra in 0..=3usize) {
        let mut rt = Runtime::new();
        let b = Matrix::zeros(a.cols(), extra, &mut rt).unwrap();
        let c = a.multiply(&b, &mut rt).unwrap();
        prop_assert_eq!(c.shape(), (a.rows(), extra));
        prop_assert!(c.as_slice().iter().all(|v| *v == Value::integer(0)));
    }
}

// ============================================================
// Access and layout properties
// ============================================================

proptest! {
    #[test]
    fn set_touches_one_slot(m in int_matrix(4), row in 1..=4usize, col in 1..=4usize) {
        let mut updated = m.clone();
        let result = updated.set(row, col, Value::integer(1000));
        if row <= m.rows() && col <= m.cols() {
            prop_assert!(result.is_ok());
            for r in 1..=m.rows() {
                for c in 1..=m.cols() {
                    let expected = if (r, c) == (row, col) {
                        Value::integer(1000)
                    } else {
                        m.get(r, c).unwrap().clone()
                    };
                    prop_assert_eq!(updated.get(r, c).unwrap(), &expected);
                }
            }
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(updated, m);
        }
    }

    #[test]
    fn trace_reports_every_slot(m in int_matrix(5)) {
        let mut sink = Vec::new();
        m.trace(&mut sink);
        prop_assert_eq!(sink.len(), m.rows() * m.cols());
        prop_assert_eq!(sink.as_slice(), m.as_slice());
    }

    #[test]
    fn concat_rows_stacks(a in int_matrix(3), rows in 0..=3usize) {
        let mut rt = Runtime::new();
        let b = Matrix::zeros(rows, a.cols(), &mut rt).unwrap();
        let c = Matrix::concat_rows(&[&a, &b]).unwrap().unwrap();
        prop_assert_eq!(c.shape(), (a.rows() + rows, a.cols()));
        prop_assert_eq!(&c.as_slice()[..a.len()], a.as_slice());
    }

    #[test]
    fn concat_cols_keeps_rows(a in int_matrix(3), cols in 0..=3usize) {
        let mut rt = Runtime::new();
        let b = Matrix::zeros(a.rows(), cols, &mut rt).unwrap();
        let c = Matrix::concat_cols(&[&a, &b]).unwrap().unwrap();
        prop_assert_eq!(c.shape(), (a.rows(), a.cols() + cols));
        for r in 0..a.rows() {
            let row = c.row(r).unwrap();
            prop_assert_eq!(&row[..a.cols()], a.row(r).unwrap());
        }
    }

    #[test]
    fn render_has_one_line_per_row(m in int_matrix(4)) {
        let rt = Runtime::new();
        let text = m.to_display_string(&rt);
        prop_assert!(text.starts_with('['));
        prop_assert!(text.ends_with(']'));
        prop_assert_eq!(text.lines().count(), m.rows().max(1));
    }
}
