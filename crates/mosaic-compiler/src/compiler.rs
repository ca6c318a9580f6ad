//! Module compilation and assembly.
//!
//! # Pipeline
//!
//! ```text
//! SourceUnit ──registry──► LanguageProvider ──compile──► CodeObject
//!                                                            │
//!                     create_module (link, bind, notify) ◄───┘
//!                                  │
//!                                  ▼
//!                               Module
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mosaic_core::{
    CompilationError, Diagnostic, ErrorSink, ModuleError, ModuleId, RaisingSink, Scope, SourceUnit,
};

use crate::code::CodeObject;
use crate::host::{HostEnvironment, NullHost};
use crate::linking::LinkedGlobals;
use crate::module::Module;
use crate::provider::{LanguageProvider, LanguageRegistry};

/// Module name reserved for the runtime's own bootstrap image.
///
/// Modules with this name skip code binding and language context setup.
pub const BOOTSTRAP_MODULE_NAME: &str = "__bootstrap__";

/// Compiler behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Pre-allocate static slots for declared globals when no scope is given.
    pub link_globals: bool,
    /// Handed to every provider's `compile_source_code`, for providers that
    /// emit extra debugging support.
    pub debug_mode: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            link_globals: true,
            debug_mode: false,
        }
    }
}

/// Compiles source units into modules.
pub struct ModuleCompiler {
    registry: Arc<LanguageRegistry>,
    host: Arc<dyn HostEnvironment>,
    options: CompilerOptions,
}

impl ModuleCompiler {
    pub fn new(registry: Arc<LanguageRegistry>) -> Self {
        Self::with_host(registry, Arc::new(NullHost))
    }

    pub fn with_host(registry: Arc<LanguageRegistry>, host: Arc<dyn HostEnvironment>) -> Self {
        Self {
            registry,
            host,
            options: CompilerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    // ==========================================================================
    // Compilation
    // ==========================================================================

    /// Compile `units` into a module, raising on the first error.
    pub fn compile(&self, name: &str, units: &[SourceUnit]) -> Result<Arc<Module>, ModuleError> {
        self.compile_with(name, None, &RaisingSink, units)
    }

    /// Compile `units` into a module with an explicit scope and error sink.
    ///
    /// Units are compiled in order. A failure the sink raises, or a failure
    /// to find a unit's language, stops compilation immediately. Errors the
    /// sink only records let compilation continue so that every unit gets
    /// diagnosed, but no module is created if any were reported.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_with(
        &self,
        name: &str,
        scope: Option<Arc<Scope>>,
        sink: &dyn ErrorSink,
        units: &[SourceUnit],
    ) -> Result<Arc<Module>, ModuleError> {
        let counting = CountingSink::new(sink);
        let mut code = Vec::with_capacity(units.len());
        for unit in units {
            code.push(Arc::new(self.compile_unit(unit, &counting)?));
        }

        let errors = counting.errors();
        if errors > 0 {
            log::debug!("module '{}' not created: {} error(s)", name, errors);
            return Err(ModuleError::DiagnosticsReported {
                module: name.to_string(),
                errors,
            });
        }

        self.create_module(name, scope, code)
    }

    /// Compile one unit with the provider for its language.
    ///
    /// The resulting code object remembers the provider instance, so module
    /// assembly prepares contexts with the provider that compiled it.
    pub fn compile_unit(&self, unit: &SourceUnit, sink: &dyn ErrorSink) -> Result<CodeObject, ModuleError> {
        let provider = self.provider_for(unit)?;
        log::trace!("compiling '{}' with {}", unit.id(), provider.name());
        let code = provider.compile_source_code(unit, sink, &self.options)?;
        Ok(code.produced_by(provider))
    }

    /// The provider for a unit: its language tag, else its file extension.
    pub fn provider_for(&self, unit: &SourceUnit) -> Result<Arc<dyn LanguageProvider>, ModuleError> {
        if let Some(language) = unit.language() {
            return Ok(self.registry.resolve(language)?);
        }
        match unit.extension() {
            Some(ext) => Ok(self.registry.resolve_by_extension(ext)?),
            None => Err(ModuleError::UndeterminedLanguage(unit.id().to_string())),
        }
    }

    // ==========================================================================
    // Assembly
    // ==========================================================================

    /// Assemble a module from already compiled code.
    ///
    /// Without a `scope`, declared globals are linked into a new scope of
    /// static slots (or an empty scope if there is no code). Every code object
    /// is bound to the new module and each distinct provider gets
    /// [`LanguageProvider::ensure_module_context`]. The host is notified last.
    ///
    /// Binding is all-or-nothing: every code object is claimed for the new
    /// module before any of them is linked, and a failed claim releases the
    /// ones already taken. The bootstrap module claims its code only for the
    /// duration of assembly.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn create_module(
        &self,
        name: &str,
        scope: Option<Arc<Scope>>,
        code: Vec<Arc<CodeObject>>,
    ) -> Result<Arc<Module>, ModuleError> {
        let bootstrap = name == BOOTSTRAP_MODULE_NAME;

        // Resolve providers before anything is claimed, so an unknown language
        // leaves the code objects untouched.
        let providers = if bootstrap {
            Vec::new()
        } else {
            self.distinct_providers(&code)?
        };

        let id = ModuleId::next();
        claim_all(&code, id)?;

        let (scope, globals) = match scope {
            Some(scope) => (scope, None),
            None if !code.is_empty() && self.options.link_globals => {
                let globals = LinkedGlobals::link(&code);
                for object in &code {
                    object.compiled().link_globals(&globals);
                }
                (Arc::new(globals.to_scope()), Some(globals))
            }
            None => (Scope::new().shared(), None),
        };

        if bootstrap {
            release_all(&code, id);
        }

        let file_name = match code.as_slice() {
            [single] => Some(single.source_id().to_string()),
            _ => None,
        };

        let module = Arc::new(Module {
            id,
            name: name.to_string(),
            scope,
            code,
            file_name,
            globals,
        });

        for provider in &providers {
            provider.ensure_module_context(&module);
        }

        log::debug!(
            "created module '{}' ({}) from {} code object(s)",
            module.name(),
            id,
            module.code().len()
        );
        self.host.module_created(&module);
        Ok(module)
    }

    fn distinct_providers(
        &self,
        code: &[Arc<CodeObject>],
    ) -> Result<Vec<Arc<dyn LanguageProvider>>, ModuleError> {
        let mut providers: Vec<Arc<dyn LanguageProvider>> = Vec::new();
        for object in code {
            let provider = match object.provider() {
                Some(provider) => Arc::clone(provider),
                None => self.registry.resolve(object.language())?,
            };
            if !providers.iter().any(|p| Arc::ptr_eq(p, &provider)) {
                providers.push(provider);
            }
        }
        Ok(providers)
    }
}

/// Bind every code object to `id`, or none of them.
fn claim_all(code: &[Arc<CodeObject>], id: ModuleId) -> Result<(), ModuleError> {
    for (claimed, object) in code.iter().enumerate() {
        if let Err(err) = object.bind(id) {
            release_all(&code[..claimed], id);
            return Err(err);
        }
    }
    Ok(())
}

fn release_all(code: &[Arc<CodeObject>], id: ModuleId) {
    for object in code {
        object.unbind(id);
    }
}

impl std::fmt::Debug for ModuleCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCompiler")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}

/// Forwards to another sink, counting the error diagnostics it accepts.
struct CountingSink<'a> {
    inner: &'a dyn ErrorSink,
    errors: AtomicUsize,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a dyn ErrorSink) -> Self {
        Self {
            inner,
            errors: AtomicUsize::new(0),
        }
    }

    fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl ErrorSink for CountingSink<'_> {
    fn report(&self, diagnostic: Diagnostic) -> Result<(), CompilationError> {
        if diagnostic.severity.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.report(diagnostic)
    }
}
