//! Modules: named, linked program images.

use std::fmt;
use std::sync::Arc;

use mosaic_core::{ExecutionContext, ModuleId, RuntimeError, Scope, Symbol, Value};

use crate::code::CodeObject;
use crate::linking::LinkedGlobals;

/// A compiled program image bound to one scope.
///
/// Only [`ModuleCompiler::create_module`](crate::ModuleCompiler::create_module)
/// builds modules. The scope is fixed for the module's lifetime.
pub struct Module {
    pub(crate) id: ModuleId,
    pub(crate) name: String,
    pub(crate) scope: Arc<Scope>,
    pub(crate) code: Vec<Arc<CodeObject>>,
    pub(crate) file_name: Option<String>,
    pub(crate) globals: Option<LinkedGlobals>,
}

impl Module {
    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    pub fn code(&self) -> &[Arc<CodeObject>] {
        &self.code
    }

    /// Identity of the module's source unit, when it has exactly one.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Static slots allocated by global linking, if it ran.
    pub fn globals(&self) -> Option<&LinkedGlobals> {
        self.globals.as_ref()
    }

    /// A fresh execution context rooted at the module scope.
    pub fn context(&self) -> ExecutionContext {
        ExecutionContext::for_module(self.id, Arc::clone(&self.scope))
    }

    /// Current value of a top-level name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.scope.get(Symbol::intern(name))
    }

    /// Run every code object in order, returning the last result.
    pub fn execute(&self) -> Result<Value, RuntimeError> {
        let ctx = self.context();
        let mut result = Value::Nil;
        for code in &self.code {
            log::trace!("running '{}' in module '{}'", code.source_id(), self.name);
            result = code.run(&ctx)?;
        }
        Ok(result)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .field("code", &self.code.len())
            .field("linked", &self.globals.as_ref().map(LinkedGlobals::len))
            .finish()
    }
}
