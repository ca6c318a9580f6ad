//! The runtime facade.
//!
//! A [`Runtime`] owns one language registry and one module compiler. There
//! is no process-wide default: the host creates a runtime at startup and
//! shares it, typically behind an `Arc`.
//!
//! # Example
//!
//! ```ignore
//! use mosaic::{Runtime, SourceUnit};
//!
//! let runtime = Runtime::new();
//! runtime.register_provider(scheme_locator(), false, &["scheme", ".ss"])?;
//!
//! let module = runtime.compile_module("main", &[SourceUnit::from_file("main.ss")?])?;
//! module.execute()?;
//! ```

use std::sync::Arc;

use mosaic_compiler::{
    CodeObject, HostEnvironment, LanguageLocator, LanguageProvider, LanguageRegistry, Module,
    ModuleCompiler, NullHost,
};
use mosaic_core::{ErrorSink, MosaicError, Scope, SourceUnit};
use mosaic_registry::ProviderResolver;

use crate::config::{RuntimeConfig, RuntimeOptions};

/// Resolver for deferred language provider locators.
pub type LanguageResolver = dyn ProviderResolver<dyn LanguageProvider>;

/// Registry, compiler and host hook for one embedding.
pub struct Runtime {
    registry: Arc<LanguageRegistry>,
    compiler: ModuleCompiler,
    options: RuntimeOptions,
}

impl Runtime {
    /// A runtime with no deferred-loading support and a silent host.
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(LanguageRegistry::new()),
            Arc::new(NullHost),
            RuntimeOptions::default(),
        )
    }

    /// A runtime that loads deferred languages through `resolver`.
    pub fn with_resolver(resolver: Arc<LanguageResolver>) -> Self {
        Self::from_parts(
            Arc::new(LanguageRegistry::with_resolver(resolver)),
            Arc::new(NullHost),
            RuntimeOptions::default(),
        )
    }

    pub fn from_parts(
        registry: Arc<LanguageRegistry>,
        host: Arc<dyn HostEnvironment>,
        options: RuntimeOptions,
    ) -> Self {
        let compiler = ModuleCompiler::with_host(Arc::clone(&registry), host)
            .with_options((&options).into());
        Self {
            registry,
            compiler,
            options,
        }
    }

    /// Build a runtime and register every configured language.
    ///
    /// Configured languages are deferred: `resolver` is only consulted when
    /// one is first used.
    pub fn from_config(
        config: &RuntimeConfig,
        resolver: Arc<LanguageResolver>,
        host: Arc<dyn HostEnvironment>,
    ) -> Result<Self, MosaicError> {
        let registry = Arc::new(LanguageRegistry::with_resolver(resolver));
        let runtime = Self::from_parts(registry, host, config.options.clone());

        for language in &config.languages {
            let identifiers = language.identifiers();
            let identifiers: Vec<&str> = identifiers.iter().map(String::as_str).collect();
            runtime.register_provider(
                LanguageLocator::deferred(&language.location, &language.type_name),
                false,
                &identifiers,
            )?;
        }

        log::debug!(
            "runtime configured with {} language(s)",
            config.languages.len()
        );
        Ok(runtime)
    }

    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    pub fn compiler(&self) -> &ModuleCompiler {
        &self.compiler
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    // ==========================================================================
    // Languages
    // ==========================================================================

    /// Register a language provider under names and `.ext` aliases.
    pub fn register_provider(
        &self,
        locator: LanguageLocator,
        override_existing: bool,
        identifiers: &[&str],
    ) -> Result<(), MosaicError> {
        Ok(self.registry.register(locator, override_existing, identifiers)?)
    }

    pub fn get_provider(&self, identifier: &str) -> Result<Arc<dyn LanguageProvider>, MosaicError> {
        Ok(self.registry.resolve(identifier)?)
    }

    /// `Ok(None)` if nothing is registered under `identifier`.
    pub fn try_get_provider(
        &self,
        identifier: &str,
    ) -> Result<Option<Arc<dyn LanguageProvider>>, MosaicError> {
        Ok(self.registry.try_resolve(identifier)?)
    }

    /// Provider for a file extension, with or without the leading dot.
    pub fn get_provider_by_extension(
        &self,
        extension: &str,
    ) -> Result<Arc<dyn LanguageProvider>, MosaicError> {
        Ok(self.registry.resolve_by_extension(extension)?)
    }

    /// Sorted snapshot of registered extensions.
    pub fn list_registered_extensions(&self) -> Vec<String> {
        self.registry.list_extensions()
    }

    // ==========================================================================
    // Modules
    // ==========================================================================

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_module(&self, name: &str, units: &[SourceUnit]) -> Result<Arc<Module>, MosaicError> {
        Ok(self.compiler.compile(name, units)?)
    }

    pub fn compile_module_with(
        &self,
        name: &str,
        scope: Arc<Scope>,
        sink: &dyn ErrorSink,
        units: &[SourceUnit],
    ) -> Result<Arc<Module>, MosaicError> {
        Ok(self.compiler.compile_with(name, Some(scope), sink, units)?)
    }

    /// Assemble a module from compiled code, linking globals into a new scope.
    pub fn create_module(
        &self,
        name: &str,
        code: Vec<Arc<CodeObject>>,
    ) -> Result<Arc<Module>, MosaicError> {
        Ok(self.compiler.create_module(name, None, code)?)
    }

    /// Assemble a module from compiled code in an existing scope.
    pub fn create_module_in(
        &self,
        name: &str,
        scope: Arc<Scope>,
        code: Vec<Arc<CodeObject>>,
    ) -> Result<Arc<Module>, MosaicError> {
        Ok(self.compiler.create_module(name, Some(scope), code)?)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}
