//! Execution context and scope chain.
//!
//! An [`ExecutionContext`] is the implicit environment every call runs in.
//! It carries a persistent, innermost-first chain of scopes: pushing a scope
//! creates a new context that shares all outer links with its parent.

use std::fmt;
use std::sync::Arc;

use crate::ids::ModuleId;
use crate::scope::Scope;

struct ScopeLink {
    scope: Arc<Scope>,
    parent: Option<Arc<ScopeLink>>,
}

impl Drop for ScopeLink {
    // Unlink uniquely owned parents in a loop so a deep chain is not freed
    // by recursion.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(link) = parent {
            parent = Arc::into_inner(link).and_then(|mut link| link.parent.take());
        }
    }
}

/// The implicit per-call environment.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    innermost: Option<Arc<ScopeLink>>,
    depth: usize,
    module: Option<ModuleId>,
}

impl ExecutionContext {
    /// A context with an empty scope chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose chain is just `scope`.
    pub fn for_scope(scope: Arc<Scope>) -> Self {
        Self::new().push(scope)
    }

    /// A context rooted at a module's scope.
    pub fn for_module(module: ModuleId, scope: Arc<Scope>) -> Self {
        let mut ctx = Self::for_scope(scope);
        ctx.module = Some(module);
        ctx
    }

    /// A child context with `scope` as the new innermost link.
    pub fn push(&self, scope: Arc<Scope>) -> Self {
        Self {
            innermost: Some(Arc::new(ScopeLink {
                scope,
                parent: self.innermost.clone(),
            })),
            depth: self.depth + 1,
            module: self.module,
        }
    }

    /// The innermost scope.
    pub fn scope(&self) -> Option<&Arc<Scope>> {
        self.innermost.as_ref().map(|link| &link.scope)
    }

    /// Walk the chain from the innermost scope outward.
    pub fn scopes(&self) -> ScopeChainIter<'_> {
        ScopeChainIter {
            next: self.innermost.as_deref(),
        }
    }

    /// Number of scopes in the chain.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The module this context executes on behalf of.
    pub fn module(&self) -> Option<ModuleId> {
        self.module
    }

    /// Whether both contexts share the same innermost link.
    pub fn same_chain(&self, other: &ExecutionContext) -> bool {
        match (&self.innermost, &other.innermost) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => self.module == other.module,
            _ => false,
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("depth", &self.depth)
            .field("module", &self.module)
            .finish()
    }
}

/// Iterator over a scope chain, innermost first.
pub struct ScopeChainIter<'a> {
    next: Option<&'a ScopeLink>,
}

impl<'a> Iterator for ScopeChainIter<'a> {
    type Item = &'a Arc<Scope>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.parent.as_deref();
        Some(&link.scope)
    }
}
