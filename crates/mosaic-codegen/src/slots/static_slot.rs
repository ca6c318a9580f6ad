//! Static (process-lifetime) slots.

use std::fmt;
use std::sync::Arc;

use mosaic_core::{GenerationId, RuntimeError, Slot, SlotRef, SlotType, Symbol, Value};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

use super::SlotFactory;

/// Every static slot ever created. Static slots are never reclaimed.
static ARENA: Lazy<Mutex<Vec<SlotRef>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Number of static slots created so far in this process.
pub fn retained_static_slots() -> usize {
    ARENA.lock().len()
}

/// A slot allocated from a [`StaticSlotFactory`].
pub struct StaticSlot {
    name: Symbol,
    slot_type: SlotType,
    generation: GenerationId,
    /// Position within its generation.
    index: usize,
    value: RwLock<Option<Value>>,
}

impl StaticSlot {
    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Slot for StaticSlot {
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

impl fmt::Debug for StaticSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StaticSlot({} {}#{}: {})",
            self.name, self.generation, self.index, self.slot_type
        )
    }
}

/// Allocates a fresh static slot on every call.
///
/// Each factory is one generation unit: all slots it hands out share its
/// [`GenerationId`]. No deduplication happens here; callers that want one slot
/// per name must ask once per name.
pub struct StaticSlotFactory {
    generation: GenerationId,
    slots: Mutex<Vec<Arc<StaticSlot>>>,
}

impl StaticSlotFactory {
    pub fn new() -> Self {
        Self {
            generation: GenerationId::next(),
            slots: Mutex::new(Vec::new()),
        }
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    /// Slots created by this factory, in creation order.
    pub fn slots(&self) -> Vec<Arc<StaticSlot>> {
        self.slots.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl Default for StaticSlotFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotFactory for StaticSlotFactory {
    fn create_slot(&self, name: Symbol, slot_type: SlotType) -> SlotRef {
        let mut slots = self.slots.lock();
        let slot = Arc::new(StaticSlot {
            name,
            slot_type,
            generation: self.generation,
            index: slots.len(),
            value: RwLock::new(None),
        });
        slots.push(Arc::clone(&slot));
        drop(slots);

        let slot: SlotRef = slot;
        ARENA.lock().push(Arc::clone(&slot));
        log::trace!("allocated static slot '{}' in {}", name, self.generation);
        slot
    }
}

impl fmt::Debug for StaticSlotFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSlotFactory")
            .field("generation", &self.generation)
            .field("slots", &self.len())
            .finish()
    }
}
