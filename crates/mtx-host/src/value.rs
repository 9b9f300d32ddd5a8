//! Script-level values as seen by foreign extensions.
//!
//! This module defines the `Value` type the host hands to extensions and
//! the polymorphic `Number` representation it uses for numeric values.

use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Handle to an object in the host's foreign heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ForeignId(u64);

impl ForeignId {
    /// Creates a handle from its raw index.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ForeignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A host number.
///
/// Exact rationals are the default representation; floats appear only when
/// a script asks for them, and contaminate any arithmetic they take part in.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// An exact rational (integers have denominator 1).
    Rational(BigRational),

    /// A double-precision float.
    Float(f64),
}

impl Number {
    /// Creates an exact integer.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    /// Returns true if this number is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Rational(r) => r.is_zero(),
            Self::Float(x) => *x == 0.0,
        }
    }

    /// Returns true if this number is an exact integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Rational(r) if r.is_integer())
    }

    /// Converts to a double, returning None if the value does not fit.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Rational(r) => Some(r.numer().to_f64()? / r.denom().to_f64()?),
            Self::Float(x) => Some(*x),
        }
    }

    /// Interprets this number as a size or index.
    ///
    /// Only non-negative integral values qualify; a float qualifies when it
    /// has no fractional part.
    #[must_use]
    pub fn as_size(&self) -> Option<usize> {
        match self {
            Self::Rational(r) if r.is_integer() && !r.is_negative() => r.to_integer().to_usize(),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 && *x >= 0.0 => x.to_usize(),
            _ => None,
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Self::Rational(r)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// A value passed between the host and its extensions.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// The "no value" sentinel.
    Nil,

    /// A boolean.
    Bool(bool),

    /// A number.
    Number(Number),

    /// An immutable string.
    Str(Rc<str>),

    /// A reference to an object in the foreign heap.
    Foreign(ForeignId),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Foreign(id) => write!(f, "<foreign {id}>"),
        }
    }
}

impl Value {
    /// Creates an exact integer value.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::Number(Number::integer(n))
    }

    /// Creates a float value.
    #[must_use]
    pub fn float(x: f64) -> Self {
        Self::Number(Number::Float(x))
    }

    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Self::Str(s.into())
    }

    /// Returns true if this is the nil sentinel.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the number, if this value is one.
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the foreign handle, if this value is one.
    #[must_use]
    pub fn as_foreign(&self) -> Option<ForeignId> {
        match self {
            Self::Foreign(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns a short name for the kind of this value, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Foreign(_) => "foreign object",
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}
