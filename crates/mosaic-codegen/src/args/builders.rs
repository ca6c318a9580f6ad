//! The built-in argument builders.

use std::sync::Arc;

use mosaic_core::{ExecutionContext, RuntimeError, Value, ValueKind};

use super::{ArgBuilder, CallShape, Guard, Priority};

/// Passes the ambient execution context as a hidden leading argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextArgBuilder;

impl ArgBuilder for ContextArgBuilder {
    fn priority(&self) -> Priority {
        Priority::CONTEXT
    }

    fn consumed_args(&self) -> usize {
        0
    }

    fn build(&self, ctx: &ExecutionContext, _args: &[Value]) -> Result<Value, RuntimeError> {
        Ok(Value::Context(ctx.clone()))
    }
}

/// Passes one logical argument through, optionally requiring its kind.
#[derive(Debug, Clone, Copy)]
pub struct SimpleArgBuilder {
    index: usize,
    kind: Option<ValueKind>,
}

impl SimpleArgBuilder {
    pub fn new(index: usize) -> Self {
        Self { index, kind: None }
    }

    pub fn typed(index: usize, kind: ValueKind) -> Self {
        Self {
            index,
            kind: Some(kind),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl ArgBuilder for SimpleArgBuilder {
    fn consumed_args(&self) -> usize {
        1
    }

    fn build(&self, _ctx: &ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
        let value = args.get(self.index).ok_or_else(|| {
            RuntimeError::other(format!("missing argument {}", self.index))
        })?;
        check_kind(self.kind, value)?;
        Ok(value.clone())
    }

    fn check(&self, _ctx: &ExecutionContext, _shape: &CallShape) -> Option<Guard> {
        let count = Guard::ArgCountAtLeast(self.index + 1);
        Some(match self.kind {
            Some(kind) => Guard::all([
                count,
                Guard::ArgKind {
                    index: self.index,
                    kind,
                },
            ]),
            None => count,
        })
    }
}

/// Passes a logical argument if supplied, otherwise a default value.
#[derive(Debug, Clone)]
pub struct DefaultArgBuilder {
    index: usize,
    default: Value,
    kind: Option<ValueKind>,
}

impl DefaultArgBuilder {
    pub fn new(index: usize, default: Value) -> Self {
        Self {
            index,
            default,
            kind: None,
        }
    }

    /// Require supplied arguments to be of `kind`.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl ArgBuilder for DefaultArgBuilder {
    fn consumed_args(&self) -> usize {
        1
    }

    fn build(&self, _ctx: &ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
        match args.get(self.index) {
            Some(value) => {
                check_kind(self.kind, value)?;
                Ok(value.clone())
            }
            None => Ok(self.default.clone()),
        }
    }

    fn check(&self, _ctx: &ExecutionContext, shape: &CallShape) -> Option<Guard> {
        // Only constrain the argument when the call actually supplies it.
        match self.kind {
            Some(kind) if self.index < shape.len() => Some(Guard::ArgKind {
                index: self.index,
                kind,
            }),
            _ => None,
        }
    }
}

/// Collects every logical argument from `start` on into one list.
#[derive(Debug, Clone, Copy)]
pub struct ParamsArgBuilder {
    start: usize,
    kind: Option<ValueKind>,
}

impl ParamsArgBuilder {
    pub fn new(start: usize) -> Self {
        Self { start, kind: None }
    }

    pub fn typed(start: usize, kind: ValueKind) -> Self {
        Self {
            start,
            kind: Some(kind),
        }
    }
}

impl ArgBuilder for ParamsArgBuilder {
    fn priority(&self) -> Priority {
        Priority::PARAMS
    }

    fn consumed_args(&self) -> usize {
        0
    }

    fn is_variadic(&self) -> bool {
        true
    }

    fn build(&self, _ctx: &ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
        let tail = args.get(self.start..).unwrap_or(&[]);
        for value in tail {
            check_kind(self.kind, value)?;
        }
        Ok(Value::list(tail.iter().cloned()))
    }

    fn check(&self, _ctx: &ExecutionContext, shape: &CallShape) -> Option<Guard> {
        let kind = self.kind?;
        let guards: Vec<Guard> = (self.start..shape.len())
            .map(|index| Guard::ArgKind { index, kind })
            .collect();
        if guards.is_empty() {
            None
        } else {
            Some(Guard::all(guards))
        }
    }
}

/// Always passes the same value, e.g. nil for an unsupported optional parameter.
#[derive(Debug, Clone)]
pub struct ConstantArgBuilder {
    value: Value,
}

impl ConstantArgBuilder {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn nil() -> Arc<dyn ArgBuilder> {
        Arc::new(Self::new(Value::Nil))
    }
}

impl ArgBuilder for ConstantArgBuilder {
    fn consumed_args(&self) -> usize {
        0
    }

    fn build(&self, _ctx: &ExecutionContext, _args: &[Value]) -> Result<Value, RuntimeError> {
        Ok(self.value.clone())
    }
}

fn check_kind(expected: Option<ValueKind>, value: &Value) -> Result<(), RuntimeError> {
    match expected {
        Some(kind) if value.kind() != kind => Err(RuntimeError::TypeMismatch {
            expected: kind.as_str().to_string(),
            actual: value.type_name().to_string(),
        }),
        _ => Ok(()),
    }
}
