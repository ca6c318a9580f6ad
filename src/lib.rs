//! Mosaic: hosting core for a multi-language dynamic runtime.
//!
//! Mosaic finds and lazily instantiates pluggable language providers,
//! compiles source units written in any of them into linked modules, and
//! provides the binding primitives generated code runs on.
//!
//! # Crates
//!
//! - `mosaic-core`: values, symbols, scopes, execution contexts, errors
//! - `mosaic-registry`: the language provider registry
//! - `mosaic-codegen`: slot factories, argument builders, free variables
//! - `mosaic-compiler`: code objects, global linking, module assembly
//!
//! This crate re-exports all of them and adds [`Runtime`], which wires one
//! registry to one compiler, and JSON [`config`].

pub mod config;
mod runtime;

pub use config::{ConfigError, LanguageSetup, RuntimeConfig, RuntimeOptions};
pub use runtime::{LanguageResolver, Runtime};

pub use mosaic_codegen::{
    ArgBuilder, ArgBuilderSet, CallShape, CallSiteBinder, ConstantArgBuilder, ContextArgBuilder,
    DefaultArgBuilder, DictionarySlotFactory, FreeVariableReference, Guard, MethodCandidate,
    ParamsArgBuilder, Priority, SimpleArgBuilder, SlotFactory, StaticSlot, StaticSlotFactory,
};
pub use mosaic_compiler::{
    BOOTSTRAP_MODULE_NAME, BindingFlags, CodeObject, CompiledCode, CompilerOptions,
    HostEnvironment, LanguageLocator, LanguageProvider, LanguageRegistry, LinkedGlobals, Module,
    ModuleCompiler, NullHost, TopLevelDecl,
};
pub use mosaic_core::{
    ArgumentError, BindingError, CellSlot, CollectingSink, CompilationError, Diagnostic,
    ErrorSink, ExecutionContext, GenerationId, ModuleError, ModuleId, MosaicError, Procedure,
    RaisingSink, RegistryError, RuntimeError, Scope, Severity, Slot, SlotRef, SlotType,
    SourceKind, SourceUnit, Span, Symbol, Value, ValueKind,
};
pub use mosaic_registry::{ProviderFactory, ProviderLocator, ProviderResolver, StaticResolver};
