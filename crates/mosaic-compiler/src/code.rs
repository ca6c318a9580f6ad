//! Compiled code objects.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use mosaic_core::{ExecutionContext, ModuleError, ModuleId, RuntimeError, SlotType, Symbol, Value};
use parking_lot::Mutex;

use crate::linking::LinkedGlobals;
use crate::provider::LanguageProvider;

bitflags! {
    /// Properties of a top-level binding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindingFlags: u8 {
        /// Assigned once at module initialization.
        const CONST = 1 << 0;
        /// Visible to other modules.
        const EXPORTED = 1 << 1;
        /// Readers may fold the value.
        const INLINABLE = 1 << 2;
    }
}

/// A top-level name a code object defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopLevelDecl {
    pub name: Symbol,
    pub slot_type: SlotType,
    pub flags: BindingFlags,
}

impl TopLevelDecl {
    pub fn new(name: impl Into<Symbol>) -> Self {
        Self {
            name: name.into(),
            slot_type: SlotType::Any,
            flags: BindingFlags::empty(),
        }
    }

    pub fn typed(mut self, slot_type: SlotType) -> Self {
        self.slot_type = slot_type;
        self
    }

    pub fn with_flags(mut self, flags: BindingFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// What a language provider produces for one source unit.
pub trait CompiledCode: Send + Sync {
    /// Top-level names this code defines, in declaration order.
    fn declarations(&self) -> Vec<TopLevelDecl> {
        Vec::new()
    }

    /// Receive the module's pre-linked global slots.
    ///
    /// Only called when the module compiler ran global linking. Code that
    /// ignores this keeps working through scope lookups.
    fn link_globals(&self, _globals: &LinkedGlobals) {}

    /// Run the code's top level.
    fn run(&self, ctx: &ExecutionContext) -> Result<Value, RuntimeError>;
}

/// Compiled form of one source unit.
///
/// Immutable apart from its module binding. Module assembly claims the
/// binding and may release it again if assembly fails, so once a module is
/// returned its code stays bound to it.
pub struct CodeObject {
    source_id: Arc<str>,
    language: Arc<str>,
    compiled: Arc<dyn CompiledCode>,
    provider: Option<Arc<dyn LanguageProvider>>,
    module: Mutex<Option<ModuleId>>,
}

impl CodeObject {
    pub fn new(
        source_id: impl AsRef<str>,
        language: impl AsRef<str>,
        compiled: Arc<dyn CompiledCode>,
    ) -> Self {
        Self {
            source_id: Arc::from(source_id.as_ref()),
            language: Arc::from(language.as_ref()),
            compiled,
            provider: None,
            module: Mutex::new(None),
        }
    }

    /// Record the provider instance that compiled this code.
    pub(crate) fn produced_by(mut self, provider: Arc<dyn LanguageProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Identity of the source unit this was compiled from.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Language id of the provider that produced it.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The provider that compiled this code, when it came through a
    /// `ModuleCompiler`. Hand-built code objects have none.
    pub fn provider(&self) -> Option<&Arc<dyn LanguageProvider>> {
        self.provider.as_ref()
    }

    pub fn compiled(&self) -> &Arc<dyn CompiledCode> {
        &self.compiled
    }

    /// The module this code is bound to, if any.
    pub fn module(&self) -> Option<ModuleId> {
        *self.module.lock()
    }

    /// Bind to `module` unless already bound elsewhere. Binding again to the
    /// same module is a no-op.
    pub(crate) fn bind(&self, module: ModuleId) -> Result<(), ModuleError> {
        let mut bound = self.module.lock();
        match *bound {
            None => {
                *bound = Some(module);
                Ok(())
            }
            Some(existing) if existing == module => Ok(()),
            Some(existing) => Err(ModuleError::CodeAlreadyBound {
                source_id: self.source_id.to_string(),
                module: existing.to_string(),
            }),
        }
    }

    /// Undo a [`bind`](Self::bind) to `module`. Bindings to any other module
    /// are left alone.
    pub(crate) fn unbind(&self, module: ModuleId) {
        let mut bound = self.module.lock();
        if *bound == Some(module) {
            *bound = None;
        }
    }

    pub fn run(&self, ctx: &ExecutionContext) -> Result<Value, RuntimeError> {
        self.compiled.run(ctx)
    }
}

impl fmt::Debug for CodeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeObject")
            .field("source_id", &self.source_id)
            .field("language", &self.language)
            .field("module", &self.module())
            .finish()
    }
}
