//! The host services an extension may call, and the extension protocol.

use crate::{ErrorCode, Evaluator, ForeignRef, HostError, HostResult, Value};

/// Services the host runtime provides to extensions.
///
/// Object safe: extensions receive `&mut dyn Host`.
pub trait Host: Evaluator {
    /// The host's representation of the integer `n`.
    fn integer(&mut self, n: i64) -> Value;

    /// Coerces a value to a non-negative size or index.
    fn size(&self, value: &Value) -> HostResult<usize>;

    /// The display text of a value.
    fn print_string(&self, value: &Value) -> String;

    /// Creates a string value.
    fn make_string(&mut self, text: String) -> Value;

    /// Registers a foreign object with the collector and wraps it as a value.
    fn add_foreign_object(&mut self, object: ForeignRef) -> Value;

    /// Resolves a foreign value to its object.
    ///
    /// Fails with [`ErrorCode::Type`] when `value` is not a foreign reference.
    fn foreign_object(&self, value: &Value) -> HostResult<ForeignRef>;
}

/// A native function exported by an extension.
pub type NativeFn = fn(Vec<Value>, &mut dyn Host) -> HostResult<Value>;

/// A loadable extension library.
pub trait Extension {
    /// Library name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Names of the exported functions. Called once at load time.
    fn manifest(&self) -> &'static [&'static str];

    /// Resolves an exported function by name.
    fn resolve(&self, symbol: &str) -> Option<NativeFn>;
}

/// Checks the argument count of a native function or method.
pub fn expect_args(function: &str, args: &[Value], expected: usize) -> HostResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(HostError::new(
            ErrorCode::ArgumentCount,
            format!(
                "{function} expects exactly {expected} argument(s), got {}",
                args.len()
            ),
        ))
    }
}
