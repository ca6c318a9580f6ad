//! Call-site binding.
//!
//! A [`CallSiteBinder`] picks, for one call site, the first candidate whose
//! argument builders accept the call's shape, and remembers that choice
//! keyed by the exact shape it was computed for. Later calls with the same
//! shape reuse it; any other shape rebinds.
//!
//! The key is the whole shape rather than the winning candidate's own guard:
//! an earlier candidate that rejected one shape may accept another that the
//! winner also accepts, and the cache must never pick differently than a
//! fresh bind would.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use mosaic_core::{BindingError, ExecutionContext, Procedure, RuntimeError, Symbol, Value};
use parking_lot::RwLock;

use crate::args::{ArgBuilderSet, CallShape, Guard};

/// One overload a call site may bind to.
#[derive(Debug, Clone)]
pub struct MethodCandidate {
    pub builders: ArgBuilderSet,
    pub target: Procedure,
}

impl MethodCandidate {
    pub fn new(builders: ArgBuilderSet, target: Procedure) -> Self {
        Self { builders, target }
    }

    /// Build the physical arguments and call the target.
    pub fn invoke(&self, ctx: &ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
        let physical = self.builders.build_all(ctx, args)?;
        self.target.call(&physical)
    }
}

#[derive(Debug, Clone)]
struct CachedBinding {
    candidate: usize,
    guard: Guard,
}

/// Binds calls of one name against a fixed candidate list.
pub struct CallSiteBinder {
    name: Symbol,
    candidates: Vec<MethodCandidate>,
    cache: RwLock<Option<CachedBinding>>,
    binds: AtomicUsize,
}

impl CallSiteBinder {
    pub fn new(name: impl Into<Symbol>, candidates: Vec<MethodCandidate>) -> Self {
        Self {
            name: name.into(),
            candidates,
            cache: RwLock::new(None),
            binds: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    /// How many times a binding had to be computed rather than reused.
    pub fn bind_count(&self) -> usize {
        self.binds.load(Ordering::Relaxed)
    }

    /// The candidate to use for `shape`, reusing the cached one if its guard holds.
    pub fn bind(&self, ctx: &ExecutionContext, shape: &CallShape) -> Result<&MethodCandidate, BindingError> {
        if let Some(cached) = self.cache.read().as_ref() {
            if cached.guard.holds(shape) {
                return Ok(&self.candidates[cached.candidate]);
            }
        }

        self.binds.fetch_add(1, Ordering::Relaxed);
        for (index, candidate) in self.candidates.iter().enumerate() {
            if candidate.builders.guard(ctx, shape).holds(shape) {
                log::trace!("bound '{}' ({}) to candidate {}", self.name, shape, index);
                *self.cache.write() = Some(CachedBinding {
                    candidate: index,
                    guard: Guard::exact(shape),
                });
                return Ok(candidate);
            }
        }

        Err(BindingError::NoApplicableMethod {
            name: self.name.as_str().to_string(),
            shape: shape.to_string(),
        })
    }

    /// Bind and call.
    pub fn invoke(&self, ctx: &ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
        let candidate = self.bind(ctx, &CallShape::of(args))?;
        candidate.invoke(ctx, args)
    }
}

impl fmt::Debug for CallSiteBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSiteBinder")
            .field("name", &self.name)
            .field("candidates", &self.candidates.len())
            .field("binds", &self.bind_count())
            .finish()
    }
}
