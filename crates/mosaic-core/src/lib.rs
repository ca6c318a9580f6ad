//! Mosaic Core
//!
//! Shared data model for the Mosaic hosting runtime. Every other crate in the
//! workspace builds on these types:
//!
//! - [`Symbol`]: process-wide interned names
//! - [`Value`]: runtime values passed between host, binders and guest code
//! - [`Slot`], [`SlotRef`], [`SlotType`]: opaque storage locations
//! - [`Scope`]: symbol to slot mapping, one link of a lookup chain
//! - [`ExecutionContext`]: the implicit per-call environment with its scope chain
//! - [`SourceUnit`]: one immutable unit of input code
//! - [`Diagnostic`], [`ErrorSink`]: compiler diagnostics routing
//! - [`error`]: the error taxonomy shared by all phases

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod scope;
pub mod slot;
pub mod source;
pub mod span;
pub mod symbol;
pub mod value;

pub use context::{ExecutionContext, ScopeChainIter};
pub use diagnostics::{CollectingSink, Diagnostic, ErrorSink, RaisingSink, Severity};
pub use error::{
    ArgumentError, BindingError, CompilationError, ModuleError, MosaicError, RegistryError,
    RuntimeError,
};
pub use ids::{GenerationId, ModuleId};
pub use scope::Scope;
pub use slot::{CellSlot, Slot, SlotRef, SlotType};
pub use source::{SourceKind, SourceUnit};
pub use span::Span;
pub use symbol::Symbol;
pub use value::{Procedure, Value, ValueKind};
