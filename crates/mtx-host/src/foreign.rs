//! Foreign objects: extension types made visible to scripts.
//!
//! A foreign object lives in the host's heap behind a [`ForeignRef`]. The
//! host reaches it through this trait only: member lookup, operators, a
//! short description, and [`ForeignObject::trace`], which is how the
//! collector learns which values the object keeps alive.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{Host, HostError, HostResult, Opcode, Value};

/// Shared handle to a heap-resident foreign object.
pub type ForeignRef = Rc<RefCell<dyn ForeignObject>>;

/// An object implemented by an extension.
pub trait ForeignObject: Any {
    /// Name of the type, for error messages.
    fn type_name(&self) -> &'static str;

    /// Short description used when the object itself is printed.
    fn describe(&self) -> String;

    /// Appends every value this object references to `to_trace`.
    ///
    /// Must reflect the current contents. A value left out may be
    /// reclaimed while the object still refers to it.
    fn trace(&self, to_trace: &mut Vec<Value>);

    /// Reads a property.
    fn get_property(&self, name: &str, _host: &mut dyn Host) -> HostResult<Value> {
        Err(no_member(self.type_name(), name))
    }

    /// Calls a method.
    fn call_method(
        &mut self,
        name: &str,
        _args: Vec<Value>,
        _host: &mut dyn Host,
    ) -> HostResult<Value> {
        Err(no_member(self.type_name(), name))
    }

    /// `self + operand`.
    fn add_operator(&self, _operand: &Value, _host: &mut dyn Host) -> HostResult<Value> {
        Err(unsupported_operator(self.type_name(), Opcode::Add))
    }

    /// `self - operand`.
    fn subtract_operator(&self, _operand: &Value, _host: &mut dyn Host) -> HostResult<Value> {
        Err(unsupported_operator(self.type_name(), Opcode::Subtract))
    }

    /// `self * operand`.
    fn multiply_operator(&self, _operand: &Value, _host: &mut dyn Host) -> HostResult<Value> {
        Err(unsupported_operator(self.type_name(), Opcode::Multiply))
    }

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

fn no_member(type_name: &str, name: &str) -> HostError {
    HostError::unknown_name(format!("{type_name} has no member `{name}`"))
}

fn unsupported_operator(type_name: &str, op: Opcode) -> HostError {
    HostError::type_error(format!(
        "operator `{}` is not supported by {type_name}",
        op.symbol()
    ))
}

/// Reads a property of `T`.
pub type Getter<T> = fn(&T, &mut dyn Host) -> HostResult<Value>;

/// Calls a method of `T`.
pub type Method<T> = fn(&mut T, Vec<Value>, &mut dyn Host) -> HostResult<Value>;

/// Name-indexed getters and methods of a foreign type.
///
/// Built once per type and consulted by its `get_property` and
/// `call_method` implementations.
pub struct MemberTable<T> {
    getters: FxHashMap<&'static str, Getter<T>>,
    methods: FxHashMap<&'static str, Method<T>>,
}

impl<T: ForeignObject> MemberTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            getters: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    /// Declares a getter.
    #[must_use]
    pub fn getter(mut self, name: &'static str, getter: Getter<T>) -> Self {
        self.getters.insert(name, getter);
        self
    }

    /// Declares a method.
    #[must_use]
    pub fn method(mut self, name: &'static str, method: Method<T>) -> Self {
        self.methods.insert(name, method);
        self
    }

    /// Runs the getter `name` on `object`.
    pub fn get(&self, object: &T, name: &str, host: &mut dyn Host) -> HostResult<Value> {
        match self.getters.get(name) {
            Some(getter) => getter(object, host),
            None => Err(no_member(object.type_name(), name)),
        }
    }

    /// Runs the method `name` on `object`.
    pub fn call(
        &self,
        object: &mut T,
        name: &str,
        args: Vec<Value>,
        host: &mut dyn Host,
    ) -> HostResult<Value> {
        match self.methods.get(name) {
            Some(method) => method(object, args, host),
            None => Err(no_member(object.type_name(), name)),
        }
    }

    /// Returns the declared member names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .getters
            .keys()
            .chain(self.methods.keys())
            .copied()
            .collect();
        names.sort_unstable();
        names
    }
}

impl<T: ForeignObject> Default for MemberTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

