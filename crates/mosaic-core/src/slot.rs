//! Opaque storage locations.
//!
//! A [`Slot`] is one named, typed storage location. Generated code only ever
//! reads and writes through [`Slot::get`] and [`Slot::set`], so the strategy
//! that created the slot (static, dictionary-backed, per-instance) is
//! invisible at the use site.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::RuntimeError;
use crate::symbol::Symbol;
use crate::value::{Value, ValueKind};

/// Declared type of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotType {
    /// Accepts any value.
    #[default]
    Any,
    /// Accepts only values of one kind.
    Of(ValueKind),
}

impl SlotType {
    /// Whether `value` may be stored in a slot of this type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            SlotType::Any => true,
            SlotType::Of(kind) => value.kind() == kind,
        }
    }

    /// Check `value` against this type, naming the slot on failure.
    pub fn check(self, slot: Symbol, value: &Value) -> Result<(), RuntimeError> {
        match self {
            SlotType::Of(kind) if value.kind() != kind => Err(RuntimeError::SlotTypeMismatch {
                slot,
                expected: kind.as_str().to_string(),
                actual: value.type_name().to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotType::Any => f.write_str("any"),
            SlotType::Of(kind) => write!(f, "{}", kind),
        }
    }
}

/// One named storage location.
pub trait Slot: Send + Sync + fmt::Debug {
    /// The name this slot was allocated for.
    fn name(&self) -> Symbol;

    /// The declared type.
    fn slot_type(&self) -> SlotType;

    /// Current value, or `None` while the location is unassigned.
    fn get(&self) -> Option<Value>;

    /// Store a value.
    ///
    /// Fails with [`RuntimeError::SlotTypeMismatch`] if the value does not fit
    /// the declared type.
    fn set(&self, value: Value) -> Result<(), RuntimeError>;

    /// Whether the location currently holds a value.
    fn is_bound(&self) -> bool {
        self.get().is_some()
    }
}

/// Shared handle to a slot.
pub type SlotRef = Arc<dyn Slot>;

/// Plain heap cell; the storage behind dictionary-backed scopes.
pub struct CellSlot {
    name: Symbol,
    slot_type: SlotType,
    value: RwLock<Option<Value>>,
}

impl CellSlot {
    /// Create an unassigned cell.
    pub fn new(name: Symbol, slot_type: SlotType) -> Self {
        Self {
            name,
            slot_type,
            value: RwLock::new(None),
        }
    }

    /// Create a cell holding `value`.
    pub fn with_value(name: Symbol, value: Value) -> Self {
        Self {
            name,
            slot_type: SlotType::Any,
            value: RwLock::new(Some(value)),
        }
    }
}

impl Slot for CellSlot {
    fn name(&self) -> Symbol {
        self.name
    }

    fn slot_type(&self) -> SlotType {
        self.slot_type
    }

    fn get(&self) -> Option<Value> {
        self.value.read().clone()
    }

    fn set(&self, value: Value) -> Result<(), RuntimeError> {
        self.slot_type.check(self.name, &value)?;
        *self.value.write() = Some(value);
        Ok(())
    }
}

impl fmt::Debug for CellSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellSlot")
            .field("name", &self.name)
            .field("type", &self.slot_type)
            .field("bound", &self.value.read().is_some())
            .finish()
    }
}
