//! Numeric semantics of the reference runtime.
//!
//! Rationals stay exact. As soon as a float takes part, the result is a
//! float.

use mtx_host::{HostError, HostResult, Number, Opcode, Value};

/// Applies `op` to two numbers.
pub fn arith(op: Opcode, lhs: &Number, rhs: &Number) -> HostResult<Number> {
    match (lhs, rhs) {
        (Number::Rational(a), Number::Rational(b)) => Ok(Number::Rational(match op {
            Opcode::Add => a + b,
            Opcode::Subtract => a - b,
            Opcode::Multiply => a * b,
        })),
        _ => {
            let (a, b) = match (lhs.to_f64(), rhs.to_f64()) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(HostError::type_error(format!(
                        "{op}: operand too large to convert to float"
                    )))
                }
            };
            Ok(Number::Float(match op {
                Opcode::Add => a + b,
                Opcode::Subtract => a - b,
                Opcode::Multiply => a * b,
            }))
        }
    }
}

/// Applies `op` to two values, which must both be numbers.
pub fn arith_values(op: Opcode, lhs: &Value, rhs: &Value) -> HostResult<Value> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => arith(op, a, b).map(Value::Number),
        _ => Err(HostError::type_error(format!(
            "cannot apply {op} to {} and {}",
            lhs.kind(),
            rhs.kind()
        ))),
    }
}
