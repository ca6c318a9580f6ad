//! Mosaic Compiler
//!
//! Turns source units written in any registered guest language into linked
//! [`Module`]s.
//!
//! # Architecture
//!
//! - [`LanguageProvider`]: what each guest language implements
//! - [`LanguageRegistry`]: finds the provider for a unit
//! - [`CodeObject`] / [`CompiledCode`]: a provider's output for one unit
//! - [`LinkedGlobals`]: static slots for a module's declared globals
//! - [`ModuleCompiler`]: compiles units and is the only way to build a [`Module`]
//! - [`HostEnvironment`]: notified once per created module

mod code;
mod compiler;
mod host;
mod linking;
mod module;
mod provider;

pub use code::{BindingFlags, CodeObject, CompiledCode, TopLevelDecl};
pub use compiler::{BOOTSTRAP_MODULE_NAME, CompilerOptions, ModuleCompiler};
pub use host::{HostEnvironment, NullHost};
pub use linking::LinkedGlobals;
pub use module::Module;
pub use provider::{LanguageLocator, LanguageProvider, LanguageRegistry};
