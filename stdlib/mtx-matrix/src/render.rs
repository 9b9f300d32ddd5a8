//! Text rendering of matrices.
//!
//! ```text
//! [      1     0
//!        0     1     ]
//! ```
//!
//! Each row starts with an indent; every element is right-aligned in a
//! fixed field, the very first one in a narrower leading field. The closing
//! bracket sits in its own field after the last row.

use mtx_host::Host;
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

/// Field widths used by [`Matrix::render_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Width of the first element of the first row.
    pub leading_width: usize,
    /// Width of every other element and of the closing bracket.
    pub field_width: usize,
    /// Spaces before each row.
    pub indent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            leading_width: 5,
            field_width: 6,
            indent: 2,
        }
    }
}

impl Matrix {
    /// Renders with the default [`RenderConfig`].
    pub fn to_display_string(&self, host: &dyn Host) -> String {
        self.render_with(&RenderConfig::default(), host)
    }

    /// Renders using `host` to turn each element into text.
    pub fn render_with(&self, config: &RenderConfig, host: &dyn Host) -> String {
        let mut out = String::from("[");
        for r in 0..self.rows() {
            if r > 0 {
                out.push('\n');
            }
            out.push_str(&" ".repeat(config.indent));
            for c in 0..self.cols() {
                let width = if r == 0 && c == 0 {
                    config.leading_width
                } else {
                    config.field_width
                };
                let text = host.print_string(self.at(r, c));
                out.push_str(&format!("{text:>width$}"));
            }
        }
        out.push_str(&format!("{:>width$}", ']', width = config.field_width));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_host::Value;
    use mtx_rts::Runtime;

    #[test]
    fn test_render_identity() {
        let mut rt = Runtime::new();
        let m = Matrix::identity(2, &mut rt).unwrap();
        assert_eq!(
            m.to_display_string(&rt),
            "[      1     0\n       0     1     ]"
        );
    }

    #[test]
    fn test_render_row_vector() {
        let rt = Runtime::new();
        let m = Matrix::row_vector(vec![Value::integer(1), Value::integer(-2), Value::float(0.5)]);
        assert_eq!(m.to_display_string(&rt), "[      1    -2   0.5     ]");
    }

    #[test]
    fn test_render_wide_element_is_not_truncated() {
        let rt = Runtime::new();
        let m = Matrix::row_vector(vec![Value::integer(1234567)]);
        assert_eq!(m.to_display_string(&rt), "[  1234567     ]");
    }

    #[test]
    fn test_render_zero_rows() {
        let rt = Runtime::new();
        let m = Matrix::from_flat(0, 3, Vec::new()).unwrap();
        assert_eq!(m.to_display_string(&rt), "[     ]");
    }

    #[test]
    fn test_render_custom_config() {
        let rt = Runtime::new();
        let m = Matrix::column_vector(vec![Value::integer(1), Value::integer(2)]);
        let config = RenderConfig {
            leading_width: 2,
            field_width: 3,
            indent: 0,
        };
        assert_eq!(m.render_with(&config, &rt), "[ 1\n  2  ]");
    }
}
