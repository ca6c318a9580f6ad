//! Runtime value type shared by the host and guest languages.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::RuntimeError;
use crate::symbol::Symbol;

/// Signature of a host-callable procedure body.
pub type ProcedureFn = dyn Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync;

/// A named callable value.
#[derive(Clone)]
pub struct Procedure {
    name: Symbol,
    body: Arc<ProcedureFn>,
}

impl Procedure {
    /// Wrap a closure as a procedure.
    pub fn new<F>(name: impl Into<Symbol>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    /// The procedure's name.
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// Call the procedure with physical arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.body)(args)
    }

    /// Whether two handles point at the same procedure body.
    pub fn ptr_eq(&self, other: &Procedure) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<procedure {}>", self.name)
    }
}

/// Discriminant of a [`Value`], used for slot typing and call-shape guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Symbol,
    List,
    Procedure,
    Context,
    Native,
}

impl ValueKind {
    /// Human-readable kind name.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Symbol => "symbol",
            ValueKind::List => "list",
            ValueKind::Procedure => "procedure",
            ValueKind::Context => "context",
            ValueKind::Native => "native",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime value.
///
/// Values are cheap to clone: every heap-backed variant is reference counted.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value.
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Symbol(Symbol),
    List(Arc<[Value]>),
    Procedure(Procedure),
    /// The ambient execution context, passed as a hidden argument.
    Context(ExecutionContext),
    /// Opaque host object.
    Native(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::List(_) => ValueKind::List,
            Value::Procedure(_) => ValueKind::Procedure,
            Value::Context(_) => ValueKind::Context,
            Value::Native(_) => ValueKind::Native,
        }
    }

    /// Human-readable name of this value's kind.
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Build a string value.
    pub fn str(text: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(text.as_ref()))
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect::<Vec<_>>().into())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&ExecutionContext> {
        match self {
            Value::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Downcast a native value.
    pub fn as_native<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Value::Native(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Symbol(s) => write!(f, "Symbol({})", s),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Procedure(p) => write!(f, "{:?}", p),
            Value::Context(_) => write!(f, "Context(...)"),
            Value::Native(_) => write!(f, "Native(...)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Procedure(a), Value::Procedure(b)) => a.ptr_eq(b),
            (Value::Context(a), Value::Context(b)) => a.same_chain(b),
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::str(v)
    }
}

impl From<Symbol> for Value {
    fn from(v: Symbol) -> Self {
        Value::Symbol(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kinds() {
        assert_eq!(Value::Nil.kind(), ValueKind::Nil);
        assert_eq!(Value::from(3).kind(), ValueKind::Int);
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::list([Value::Nil]).kind(), ValueKind::List);
    }

    #[test]
    fn procedure_call() {
        let add = Procedure::new("add", |args: &[Value]| {
            let sum = args.iter().filter_map(Value::as_int).sum::<i64>();
            Ok(Value::Int(sum))
        });
        assert_eq!(add.call(&[Value::Int(2), Value::Int(3)]).unwrap(), Value::Int(5));
        assert_eq!(format!("{:?}", add), "#<procedure add>");
    }

    #[test]
    fn procedure_equality_is_identity() {
        let p = Procedure::new("p", |_: &[Value]| Ok(Value::Nil));
        let q = Procedure::new("p", |_: &[Value]| Ok(Value::Nil));
        assert_eq!(Value::Procedure(p.clone()), Value::Procedure(p.clone()));
        assert_ne!(Value::Procedure(p), Value::Procedure(q));
    }

    #[test]
    fn native_downcast() {
        let v = Value::Native(Arc::new(42u8));
        assert_eq!(v.as_native::<u8>(), Some(&42));
        assert!(v.as_native::<String>().is_none());
    }
}
