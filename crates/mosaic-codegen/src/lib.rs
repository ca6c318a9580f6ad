//! Mosaic Codegen
//!
//! Run-time binding primitives used by code that language providers generate:
//!
//! - [`slots`]: how a name becomes storage ([`SlotFactory`])
//! - [`args`]: how a call's physical arguments are produced ([`ArgBuilder`])
//! - [`binder`]: cached call-site binding over argument builders
//! - [`free_var`]: run-time lookup of names that have no static slot

pub mod args;
pub mod binder;
pub mod free_var;
pub mod slots;

pub use args::{
    ArgBuilder, ArgBuilderSet, CallShape, ConstantArgBuilder, ContextArgBuilder,
    DefaultArgBuilder, Guard, ParamsArgBuilder, Priority, SimpleArgBuilder,
};
pub use binder::{CallSiteBinder, MethodCandidate};
pub use free_var::FreeVariableReference;
pub use slots::{DictionarySlotFactory, SlotFactory, StaticSlot, StaticSlotFactory};
