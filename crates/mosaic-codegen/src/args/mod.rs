//! Argument builders.
//!
//! A generated call to a host procedure does not pass the caller's logical
//! arguments straight through. Each physical parameter of the target is
//! produced by one [`ArgBuilder`], which may read a logical argument, supply a
//! default, collect a tail into a list, or inject the ambient
//! [`ExecutionContext`].
//!
//! Builders are evaluated in [`Priority`] order (lower first, insertion order
//! among equals). The context builder has the lowest priority, so the context
//! is always the leading physical argument.

mod builders;
mod guard;

pub use builders::{
    ConstantArgBuilder, ContextArgBuilder, DefaultArgBuilder, ParamsArgBuilder, SimpleArgBuilder,
};
pub use guard::{CallShape, Guard};

use std::fmt;
use std::sync::Arc;

use mosaic_core::{ExecutionContext, RuntimeError, Value};

/// Evaluation precedence of an [`ArgBuilder`]; lower values go first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u16);

impl Priority {
    /// Hidden context argument. Always first.
    pub const CONTEXT: Priority = Priority(0);
    /// Ordinary positional parameters, defaults and constants.
    pub const NORMAL: Priority = Priority(100);
    /// Variadic tail.
    pub const PARAMS: Priority = Priority(200);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

/// Produces exactly one physical argument of a call.
pub trait ArgBuilder: Send + Sync + fmt::Debug {
    fn priority(&self) -> Priority {
        Priority::NORMAL
    }

    /// Logical arguments this builder can consume. Zero for hidden arguments.
    fn consumed_args(&self) -> usize;

    /// Whether this builder takes every remaining logical argument.
    fn is_variadic(&self) -> bool {
        false
    }

    fn build(&self, ctx: &ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError>;

    /// Condition under which a binding using this builder stays valid.
    ///
    /// `None` means the builder accepts any shape.
    fn check(&self, _ctx: &ExecutionContext, _shape: &CallShape) -> Option<Guard> {
        None
    }
}

/// The ordered builders for one target procedure.
#[derive(Debug, Clone, Default)]
pub struct ArgBuilderSet {
    builders: Vec<Arc<dyn ArgBuilder>>,
}

impl ArgBuilderSet {
    pub fn new(builders: impl IntoIterator<Item = Arc<dyn ArgBuilder>>) -> Self {
        let mut builders: Vec<_> = builders.into_iter().collect();
        // Stable: equal priorities keep insertion order.
        builders.sort_by_key(|b| b.priority());
        Self { builders }
    }

    pub fn builders(&self) -> &[Arc<dyn ArgBuilder>] {
        &self.builders
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Number of logical arguments visible to callers, excluding a variadic tail.
    pub fn visible_arity(&self) -> usize {
        self.builders
            .iter()
            .filter(|b| !b.is_variadic())
            .map(|b| b.consumed_args())
            .sum()
    }

    pub fn is_variadic(&self) -> bool {
        self.builders.iter().any(|b| b.is_variadic())
    }

    /// Produce the physical argument list, one value per builder.
    pub fn build_all(&self, ctx: &ExecutionContext, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
        self.builders.iter().map(|b| b.build(ctx, args)).collect()
    }

    /// Guard under which these builders bind calls of `shape`.
    ///
    /// The guard pins the argument count, so a cached binding is never reused
    /// for a different arity. Callers must still test it against `shape`: a
    /// guard that does not hold means the set cannot bind this shape at all.
    pub fn guard(&self, ctx: &ExecutionContext, shape: &CallShape) -> Guard {
        let mut guards = vec![Guard::ArgCount(shape.len())];
        if !self.is_variadic() {
            guards.push(Guard::ArgCountAtMost(self.visible_arity()));
        }
        guards.extend(self.builders.iter().filter_map(|b| b.check(ctx, shape)));
        Guard::all(guards)
    }
}
