//! Values flowing through intercepting hooks.
//!
//! # Responsibility
//! - Model method references, module references and call results handed to
//!   latches by the host.
//! - Derive the display type name printed for call results.
//!
//! # Invariants
//! - Cloning a reference shares the underlying target; identity is preserved.
//! - `display_type` is derived from the value itself, never from its tag name.

use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Callable body of one module method.
pub type MethodFn = dyn Fn(&[CallValue]) -> CallValue + Send + Sync;

/// Shared reference to one invocable module method.
#[derive(Clone)]
pub struct MethodRef {
    name: String,
    body: Arc<MethodFn>,
}

impl MethodRef {
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&[CallValue]) -> CallValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the method body.
    pub fn invoke(&self, args: &[CallValue]) -> CallValue {
        (self.body)(args)
    }

    /// Returns `true` when both references point at the same method body.
    pub fn same_target(&self, other: &MethodRef) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl Debug for MethodRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for MethodRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_target(other)
    }
}

/// Shared reference to one host module.
#[derive(Debug, Clone)]
pub struct ModuleRef(Arc<str>);

impl ModuleRef {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` when both references point at the same module.
    pub fn same_module(&self, other: &ModuleRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ModuleRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_module(other)
    }
}

/// Structured value with a constructed type name.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    /// Name of the type that constructed this value, e.g. `Connection`.
    pub type_name: String,
    pub fields: Value,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<String>, fields: Value) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }
}

impl Default for ObjectValue {
    fn default() -> Self {
        Self::new("Object", Value::Object(Map::new()))
    }
}

/// Any value passed through an intercepting hook.
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Method(MethodRef),
    Object(ObjectValue),
}

impl CallValue {
    /// Display type printed for call results.
    ///
    /// Structured values report their constructed type name; everything else
    /// reports its primitive type tag.
    pub fn display_type(&self) -> &str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Method(_) => "function",
            Self::Object(object) => object.type_name.as_str(),
        }
    }

    pub fn as_method(&self) -> Option<&MethodRef> {
        match self {
            Self::Method(method) => Some(method),
            _ => None,
        }
    }
}

impl From<bool> for CallValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CallValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CallValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for CallValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CallValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<MethodRef> for CallValue {
    fn from(value: MethodRef) -> Self {
        Self::Method(value)
    }
}

impl From<ObjectValue> for CallValue {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

impl From<Value> for CallValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            // `as_f64` only fails with arbitrary-precision numbers enabled.
            Value::Number(number) => Self::Number(number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Object(ObjectValue::new("Array", Value::Array(items))),
            Value::Object(map) => Self::Object(ObjectValue::new("Object", Value::Object(map))),
        }
    }
}
