//! The contract every guest language implements.

use mosaic_core::{CompilationError, ErrorSink, SourceUnit};
use mosaic_registry::{ProviderLocator, ProviderRegistry};

use crate::code::CodeObject;
use crate::compiler::CompilerOptions;
use crate::module::Module;

/// A guest language's compiler and runtime entry points.
///
/// One instance exists per registered implementation and lives for the rest
/// of the process, so implementations must be safe to share across threads.
pub trait LanguageProvider: Send + Sync {
    /// Display name, also used as the language id of produced code objects.
    fn name(&self) -> &str;

    /// Compile one source unit.
    ///
    /// Problems in the source are reported to `sink`. If the sink returns an
    /// error the provider must stop and propagate it; otherwise it may keep
    /// going and return a best-effort code object, which the module compiler
    /// discards when any error was reported.
    ///
    /// `options` are the calling compiler's; providers that can emit extra
    /// debugging support do so when `debug_mode` is set.
    fn compile_source_code(
        &self,
        unit: &SourceUnit,
        sink: &dyn ErrorSink,
        options: &CompilerOptions,
    ) -> Result<CodeObject, CompilationError>;

    /// Prepare language-level state for a freshly created module.
    ///
    /// Called once per module for every distinct language among its code.
    fn ensure_module_context(&self, _module: &Module) {}
}

/// Registry of language providers.
pub type LanguageRegistry = ProviderRegistry<dyn LanguageProvider>;

/// Locator for a language provider implementation.
pub type LanguageLocator = ProviderLocator<dyn LanguageProvider>;
