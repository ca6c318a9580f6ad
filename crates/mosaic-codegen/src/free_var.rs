//! Free-variable references.
//!
//! A name that has no static slot at code-generation time compiles to a
//! [`FreeVariableReference`]. Evaluating it walks the execution context's
//! scope chain from the innermost scope outward; the first scope that holds a
//! value for the name wins.

use mosaic_core::{ArgumentError, ExecutionContext, RuntimeError, Symbol, Value};

/// A reference to a name resolved through the scope chain at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreeVariableReference {
    name: Symbol,
}

impl FreeVariableReference {
    /// Create a reference, rejecting the empty and invalid symbols.
    pub fn new(name: Symbol) -> Result<Self, ArgumentError> {
        if name.is_invalid() {
            return Err(ArgumentError::InvalidSymbol);
        }
        if name.is_empty() {
            return Err(ArgumentError::EmptySymbol);
        }
        Ok(Self { name })
    }

    /// Intern `name` and create a reference to it.
    pub fn named(name: &str) -> Result<Self, ArgumentError> {
        Self::new(Symbol::intern(name))
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    /// Current value of the innermost enclosing binding.
    pub fn evaluate(&self, ctx: &ExecutionContext) -> Result<Value, RuntimeError> {
        ctx.scopes()
            .find_map(|scope| scope.get(self.name))
            .ok_or(RuntimeError::UnboundName { name: self.name })
    }

    /// Assign to the innermost scope that already binds the name.
    ///
    /// Assignment never introduces a binding; an unknown name is an
    /// [`RuntimeError::UnboundName`] error, just like reading it.
    pub fn assign(&self, ctx: &ExecutionContext, value: Value) -> Result<(), RuntimeError> {
        let slot = ctx
            .scopes()
            .find_map(|scope| scope.slot(self.name))
            .ok_or(RuntimeError::UnboundName { name: self.name })?;
        slot.set(value)
    }
}
