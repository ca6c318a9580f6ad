//! Storage slot allocation.
//!
//! Compiled code never touches variable storage directly: it asks a
//! [`SlotFactory`] for a slot once, at code-generation time, and keeps the
//! returned handle. Which factory is used decides where the value lives.
//!
//! | Factory | Storage | Same name twice |
//! |---------|---------|-----------------|
//! | [`StaticSlotFactory`] | process-lifetime arena | two distinct slots |
//! | [`DictionarySlotFactory`] | a [`Scope`](mosaic_core::Scope) | the existing slot |

mod dictionary;
mod static_slot;

pub use dictionary::DictionarySlotFactory;
pub use static_slot::{StaticSlot, StaticSlotFactory, retained_static_slots};

use mosaic_core::{SlotRef, SlotType, Symbol};

/// Allocates storage for a named variable.
pub trait SlotFactory: Send + Sync {
    /// Return a slot that stores values of `slot_type` under `name`.
    fn create_slot(&self, name: Symbol, slot_type: SlotType) -> SlotRef;
}
