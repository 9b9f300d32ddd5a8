//! The host's arithmetic evaluator, as seen from an extension.
//!
//! Extensions never compute on numbers directly. They build a tiny program
//! of [`Instruction`]s and hand it to the host together with its operands,
//! so whatever the host means by "add" (exact rationals, promotion to
//! float, overflow checks) is preserved.

use std::fmt;

use crate::{HostResult, Value};

/// Arithmetic opcodes an extension may ask the host to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `lhs + rhs`.
    Add,
    /// `lhs - rhs`.
    Subtract,
    /// `lhs * rhs`.
    Multiply,
}

impl Opcode {
    /// Returns the infix symbol for this opcode.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Subtract => write!(f, "SUBTRACT"),
            Self::Multiply => write!(f, "MULTIPLY"),
        }
    }
}

/// A single instruction of an evaluator program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub operation: Opcode,
}

impl From<Opcode> for Instruction {
    fn from(operation: Opcode) -> Self {
        Self { operation }
    }
}

/// Executes arithmetic on host values.
///
/// Programs run on an operand stack: the operands are pushed in order, and
/// each binary instruction pops `rhs`, then `lhs`, and pushes the result.
/// Exactly one value must remain when the program ends.
pub trait Evaluator {
    /// Runs `program` over `operands` and returns the single result.
    fn execute(&mut self, program: &[Instruction], operands: Vec<Value>) -> HostResult<Value>;

    /// The additive identity, used as the value of an empty sum.
    fn zero(&mut self) -> Value;

    /// Runs a single binary instruction.
    fn apply(&mut self, op: Opcode, lhs: Value, rhs: Value) -> HostResult<Value> {
        self.execute(&[Instruction::from(op)], vec![lhs, rhs])
    }
}
