//! The reference host: evaluator, heap, globals and dispatch.

use mtx_host::{
    Evaluator, Extension, ForeignRef, Host, HostError, HostResult, Instruction, NativeFn, Opcode,
    Value,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::config::RuntimeConfig;
use crate::heap::{ForeignHeap, GcStats};
use crate::number::arith_values;

/// A single-threaded host runtime.
///
/// Owns the foreign heap, the table of native functions loaded from
/// extensions, and the global bindings (which are collector roots).
pub struct Runtime {
    config: RuntimeConfig,
    heap: ForeignHeap,
    natives: FxHashMap<&'static str, NativeFn>,
    globals: FxHashMap<String, Value>,
    allocations_since_gc: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a runtime with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Creates a runtime with the given configuration.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            heap: ForeignHeap::new(),
            natives: FxHashMap::default(),
            globals: FxHashMap::default(),
            allocations_since_gc: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Loads an extension: reads its manifest once and binds every listed
    /// function. Returns the number of functions bound.
    pub fn load_extension(&mut self, extension: &dyn Extension) -> HostResult<usize> {
        let manifest = extension.manifest();
        for &symbol in manifest {
            let function = extension.resolve(symbol).ok_or_else(|| {
                HostError::internal(format!(
                    "extension `{}` lists `{symbol}` but does not export it",
                    extension.name()
                ))
            })?;
            self.natives.insert(symbol, function);
        }
        debug!(
            extension = extension.name(),
            functions = manifest.len(),
            "extension loaded"
        );
        Ok(manifest.len())
    }

    /// Names of the loaded native functions, sorted.
    #[must_use]
    pub fn natives(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.natives.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Calls a native function.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> HostResult<Value> {
        let function = self
            .natives
            .get(name)
            .copied()
            .ok_or_else(|| HostError::unknown_name(format!("unknown function `{name}`")))?;
        trace!(function = name, args = args.len(), "native call");
        function(args, self)
    }

    /// Reads a property of a foreign object.
    pub fn get_member(&mut self, target: &Value, name: &str) -> HostResult<Value> {
        let object = self.foreign_object(target)?;
        let object = object.try_borrow().map_err(|_| busy())?;
        object.get_property(name, self)
    }

    /// Calls a method of a foreign object.
    pub fn call_method(&mut self, target: &Value, name: &str, args: Vec<Value>) -> HostResult<Value> {
        let object = self.foreign_object(target)?;
        let mut object = object.try_borrow_mut().map_err(|_| busy())?;
        trace!(method = name, args = args.len(), "method call");
        object.call_method(name, args, self)
    }

    /// Evaluates `lhs op rhs`.
    ///
    /// A foreign left operand handles the operator itself; numbers go
    /// through the evaluator.
    pub fn binary(&mut self, op: Opcode, lhs: &Value, rhs: &Value) -> HostResult<Value> {
        if lhs.as_foreign().is_none() {
            return self.apply(op, lhs.clone(), rhs.clone());
        }
        let object = self.foreign_object(lhs)?;
        let object = object.try_borrow().map_err(|_| busy())?;
        match op {
            Opcode::Add => object.add_operator(rhs, self),
            Opcode::Subtract => object.subtract_operator(rhs, self),
            Opcode::Multiply => object.multiply_operator(rhs, self),
        }
    }

    /// Binds a global. Globals are collector roots.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    /// Looks up a global.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Global bindings, sorted by name.
    #[must_use]
    pub fn globals(&self) -> Vec<(&str, &Value)> {
        let mut globals: Vec<_> = self
            .globals
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        globals.sort_unstable_by_key(|(name, _)| *name);
        globals
    }

    /// Number of live foreign objects.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.heap.len()
    }

    /// Runs a full collection. Globals and `extra_roots` are the roots.
    pub fn collect(&mut self, extra_roots: &[Value]) -> GcStats {
        let stats = self
            .heap
            .collect(self.globals.values().chain(extra_roots.iter()));
        self.allocations_since_gc = 0;
        debug!(
            live_before = stats.live_before,
            live_after = stats.live_after,
            freed = stats.freed,
            "collection finished"
        );
        stats
    }

    /// Collects if enough allocations happened since the last collection.
    ///
    /// Call only at safe points, where every live value is either a global
    /// or in `extra_roots`.
    pub fn maybe_collect(&mut self, extra_roots: &[Value]) -> Option<GcStats> {
        let threshold = self.config.gc_threshold;
        if threshold == 0 || self.allocations_since_gc < threshold {
            return None;
        }
        Some(self.collect(extra_roots))
    }
}

fn busy() -> HostError {
    HostError::internal("foreign object is already in use")
}

impl Evaluator for Runtime {
    fn execute(&mut self, program: &[Instruction], operands: Vec<Value>) -> HostResult<Value> {
        if program.len() > self.config.max_program_len {
            return Err(HostError::internal(format!(
                "program of {} instructions exceeds the limit of {}",
                program.len(),
                self.config.max_program_len
            )));
        }

        let mut stack = operands;
        for instruction in program {
            let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                return Err(HostError::internal(format!(
                    "stack underflow executing {}",
                    instruction.operation
                )));
            };
            stack.push(arith_values(instruction.operation, &lhs, &rhs)?);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(result), true) => Ok(result),
            (None, _) => Err(HostError::internal("program produced no value")),
            (Some(_), false) => Err(HostError::internal(format!(
                "program left {} values on the stack",
                stack.len() + 1
            ))),
        }
    }

    fn zero(&mut self) -> Value {
        Value::integer(0)
    }
}

impl Host for Runtime {
    fn integer(&mut self, n: i64) -> Value {
        Value::integer(n)
    }

    fn size(&self, value: &Value) -> HostResult<usize> {
        match value {
            Value::Number(n) => n.as_size().ok_or_else(|| {
                HostError::type_error(format!("expected a non-negative integer, got {n}"))
            }),
            other => Err(HostError::type_error(format!(
                "expected a non-negative integer, got {}",
                other.kind()
            ))),
        }
    }

    fn print_string(&self, value: &Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Foreign(id) => match self.heap.get(*id) {
                Some(object) => match object.try_borrow() {
                    Ok(object) => object.describe(),
                    Err(_) => format!("<foreign {id}>"),
                },
                None => format!("<collected {id}>"),
            },
        }
    }

    fn make_string(&mut self, text: String) -> Value {
        Value::string(text)
    }

    fn add_foreign_object(&mut self, object: ForeignRef) -> Value {
        self.allocations_since_gc += 1;
        Value::Foreign(self.heap.insert(object))
    }

    fn foreign_object(&self, value: &Value) -> HostResult<ForeignRef> {
        let id = value.as_foreign().ok_or_else(|| {
            HostError::type_error(format!("expected a foreign object, got {}", value.kind()))
        })?;
        self.heap
            .get(id)
            .ok_or_else(|| HostError::internal(format!("dangling foreign reference {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_host::{ErrorCode, Number};

    fn add(n: usize) -> Vec<Instruction> {
        vec![Instruction::from(Opcode::Add); n]
    }

    #[test]
    fn test_execute_single_instruction() {
        let mut rt = Runtime::new();
        let result = rt
            .apply(Opcode::Subtract, Value::integer(7), Value::integer(10))
            .unwrap();
        assert_eq!(result, Value::integer(-3));
    }

    #[test]
    fn test_execute_stack_program() {
        let mut rt = Runtime::new();
        let operands = vec![Value::integer(1), Value::integer(2), Value::integer(3)];
        let result = rt.execute(&add(2), operands).unwrap();
        assert_eq!(result, Value::integer(6));
    }

    #[test]
    fn test_execute_underflow() {
        let mut rt = Runtime::new();
        let err = rt.execute(&add(2), vec![Value::integer(1), Value::integer(2)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }

    #[test]
    fn test_execute_leftover_operands() {
        let mut rt = Runtime::new();
        let err = rt
            .execute(&add(1), vec![Value::integer(1), Value::integer(2), Value::integer(3)])
            .unwrap_err();
        assert_eq!(err.message, "program left 2 values on the stack");
    }

    #[test]
    fn test_program_length_limit() {
        let mut rt = Runtime::with_config(RuntimeConfig {
            max_program_len: 1,
            ..RuntimeConfig::default()
        });
        let err = rt.execute(&add(2), vec![Value::integer(1); 3]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }

    #[test]
    fn test_size_coercion() {
        let rt = Runtime::new();
        assert_eq!(rt.size(&Value::integer(3)).unwrap(), 3);
        assert_eq!(rt.size(&Value::float(2.0)).unwrap(), 2);
        assert_eq!(rt.size(&Value::integer(-1)).unwrap_err().code, ErrorCode::Type);
        assert_eq!(rt.size(&Value::string("3")).unwrap_err().code, ErrorCode::Type);
    }

    #[test]
    fn test_print_string() {
        let rt = Runtime::new();
        assert_eq!(rt.print_string(&Value::integer(42)), "42");
        assert_eq!(rt.print_string(&Value::Number(Number::Float(0.25))), "0.25");
        assert_eq!(rt.print_string(&Value::Nil), "nil");
        assert_eq!(rt.print_string(&Value::string("hi")), "hi");
    }

    #[test]
    fn test_unknown_function() {
        let mut rt = Runtime::new();
        let err = rt.call("nope", Vec::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownName);
    }

    #[test]
    fn test_binary_on_numbers() {
        let mut rt = Runtime::new();
        let result = rt
            .binary(Opcode::Multiply, &Value::integer(6), &Value::integer(7))
            .unwrap();
        assert_eq!(result, Value::integer(42));
    }

    #[test]
    fn test_maybe_collect_respects_threshold() {
        let mut rt = Runtime::with_config(RuntimeConfig {
            gc_threshold: 0,
            ..RuntimeConfig::default()
        });
        assert!(rt.maybe_collect(&[]).is_none());
    }
}
