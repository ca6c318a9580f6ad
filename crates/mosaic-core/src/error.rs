//! Unified error types for Mosaic.
//!
//! Each phase of hosting has its own error type so callers can react to the
//! failure they actually care about:
//!
//! ```text
//! MosaicError (top-level wrapper)
//! ├── ArgumentError     - malformed construction input
//! ├── RegistryError     - provider registration and loading
//! ├── CompilationError  - diagnostics raised while compiling a source unit
//! ├── ModuleError       - module assembly
//! ├── BindingError      - call-site binding
//! └── RuntimeError      - evaluation, including unbound names
//! ```
//!
//! Name-resolution failures ([`RuntimeError::UnboundName`]) are kept apart
//! from registry failures so a host can surface "undefined variable" to the
//! guest program while treating a missing provider as a configuration error.

use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::symbol::Symbol;

// ============================================================================
// Argument Errors
// ============================================================================

/// Construction input that is rejected before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A symbol argument was the empty name.
    #[error("symbol must not be empty")]
    EmptySymbol,

    /// A symbol argument was the invalid sentinel.
    #[error("symbol is the invalid sentinel")]
    InvalidSymbol,

    /// A registry identifier was empty or a bare '.'.
    #[error("invalid language identifier '{0}'")]
    InvalidIdentifier(String),
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors from registering or resolving language providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An identifier is already claimed by a different implementation.
    #[error("identifier '{identifier}' is registered to '{existing}', cannot map it to '{requested}'")]
    Conflict {
        identifier: String,
        existing: String,
        requested: String,
    },

    /// The implementation could not be located.
    #[error("implementation '{type_name}' not found in '{location}'")]
    MissingImplementation { type_name: String, location: String },

    /// The implementation was located but failed to construct.
    #[error("implementation '{type_name}' failed to initialize: {reason}")]
    InvalidImplementation { type_name: String, reason: String },

    /// No provider is registered under this identifier or type.
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors raised while a provider compiles a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// A diagnostic that the error sink chose to raise.
    #[error("{0}")]
    Reported(Diagnostic),

    /// The provider failed for a reason it did not report as a diagnostic.
    #[error("{language} compiler failed on '{source_id}': {message}")]
    Failed {
        language: String,
        source_id: String,
        message: String,
    },
}

// ============================================================================
// Module Errors
// ============================================================================

/// Errors from compiling source units into a module or assembling one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// Diagnostics were collected without raising, so nothing was linked.
    #[error("module '{module}' not created: {errors} error(s) reported")]
    DiagnosticsReported { module: String, errors: usize },

    /// No language could be determined for a source unit.
    #[error("source unit '{0}' has no language tag and no usable file extension")]
    UndeterminedLanguage(String),

    /// A code object already belongs to another module.
    #[error("code object from '{source_id}' is already bound to {module}")]
    CodeAlreadyBound { source_id: String, module: String },
}

// ============================================================================
// Binding Errors
// ============================================================================

/// Errors from binding a call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// No candidate's argument builders accept the call shape.
    #[error("no applicable method '{name}' for arguments ({shape})")]
    NoApplicableMethod { name: String, shape: String },
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors during evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A free variable was not found in any enclosing scope.
    #[error("unbound variable '{name}'")]
    UnboundName { name: Symbol },

    /// A slot rejected a value of the wrong kind.
    #[error("slot '{slot}' holds {expected}, got {actual}")]
    SlotTypeMismatch {
        slot: Symbol,
        expected: String,
        actual: String,
    },

    /// A value had the wrong kind.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error(transparent)]
    Binding(#[from] BindingError),

    /// A generic runtime error.
    #[error("{message}")]
    Other { message: String },
}

impl RuntimeError {
    pub fn other(message: impl Into<String>) -> Self {
        RuntimeError::Other {
            message: message.into(),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for all Mosaic operations.
///
/// Each variant uses `#[from]` so phase errors convert with `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MosaicError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl MosaicError {
    /// Whether this is a language-level name-resolution failure.
    pub fn is_name_resolution(&self) -> bool {
        matches!(self, MosaicError::Runtime(RuntimeError::UnboundName { .. }))
    }

    /// Whether this is a host configuration failure (registry or loading).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MosaicError::Registry(_) | MosaicError::Module(ModuleError::Registry(_))
        )
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, MosaicError::Runtime(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_display() {
        let err = RegistryError::Conflict {
            identifier: "scheme".to_string(),
            existing: "A".to_string(),
            requested: "B".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "identifier 'scheme' is registered to 'A', cannot map it to 'B'"
        );
    }

    #[test]
    fn unbound_name_display() {
        let err = RuntimeError::UnboundName {
            name: Symbol::intern("y"),
        };
        assert_eq!(err.to_string(), "unbound variable 'y'");
    }

    #[test]
    fn argument_error_converts_to_registry() {
        let err: RegistryError = ArgumentError::InvalidIdentifier(".".to_string()).into();
        assert!(matches!(err, RegistryError::Argument(_)));
        assert_eq!(err.to_string(), "invalid language identifier '.'");
    }

    #[test]
    fn mosaic_error_classification() {
        let unbound: MosaicError = RuntimeError::UnboundName {
            name: Symbol::intern("z"),
        }
        .into();
        assert!(unbound.is_name_resolution());
        assert!(unbound.is_runtime());
        assert!(!unbound.is_configuration());

        let missing: MosaicError = RegistryError::UnknownLanguage("cobol".into()).into();
        assert!(missing.is_configuration());
        assert!(!missing.is_name_resolution());

        let nested: MosaicError =
            ModuleError::Registry(RegistryError::UnknownLanguage("x".into())).into();
        assert!(nested.is_configuration());
    }

    #[test]
    fn transparent_display() {
        let err: MosaicError = BindingError::NoApplicableMethod {
            name: "f".to_string(),
            shape: "int, string".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "no applicable method 'f' for arguments (int, string)"
        );
    }
}
