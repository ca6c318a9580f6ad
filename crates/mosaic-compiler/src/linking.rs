//! Global linking.
//!
//! When a module is created without a caller-supplied scope, every top-level
//! name its code declares gets one static slot up front. The slots are bound
//! into the module's scope and handed to each code object, so generated code
//! can read known globals through a slot handle instead of a scope lookup.

use std::sync::Arc;

use mosaic_codegen::{SlotFactory, StaticSlotFactory};
use mosaic_core::{GenerationId, Scope, SlotRef, Symbol};
use rustc_hash::FxHashMap;

use crate::code::{BindingFlags, CodeObject};

/// The static slots allocated for one module's top-level names.
#[derive(Debug, Clone)]
pub struct LinkedGlobals {
    generation: GenerationId,
    /// Declaration order.
    slots: Vec<(SlotRef, BindingFlags)>,
    by_name: FxHashMap<Symbol, usize>,
}

impl LinkedGlobals {
    /// Allocate one slot per distinct declared name; the first declaration wins.
    pub fn link(code: &[Arc<CodeObject>]) -> Self {
        let factory = StaticSlotFactory::new();
        let mut slots = Vec::new();
        let mut by_name = FxHashMap::default();

        for object in code {
            for decl in object.compiled().declarations() {
                if by_name.contains_key(&decl.name) {
                    log::trace!(
                        "'{}' in '{}' already linked, keeping first declaration",
                        decl.name,
                        object.source_id()
                    );
                    continue;
                }
                let slot = factory.create_slot(decl.name, decl.slot_type);
                by_name.insert(decl.name, slots.len());
                slots.push((slot, decl.flags));
            }
        }

        log::debug!(
            "linked {} global(s) in {}",
            slots.len(),
            factory.generation()
        );
        Self {
            generation: factory.generation(),
            slots,
            by_name,
        }
    }

    /// A scope pre-bound with every linked slot.
    pub fn to_scope(&self) -> Scope {
        Scope::with_slots(self.slots.iter().map(|(slot, _)| Arc::clone(slot)))
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn slot(&self, name: Symbol) -> Option<&SlotRef> {
        self.by_name.get(&name).map(|&i| &self.slots[i].0)
    }

    pub fn flags(&self, name: Symbol) -> Option<BindingFlags> {
        self.by_name.get(&name).map(|&i| self.slots[i].1)
    }

    /// Linked names in declaration order.
    pub fn names(&self) -> Vec<Symbol> {
        self.slots.iter().map(|(slot, _)| slot.name()).collect()
    }

    /// Names flagged [`BindingFlags::EXPORTED`].
    pub fn exports(&self) -> Vec<Symbol> {
        self.slots
            .iter()
            .filter(|(_, flags)| flags.contains(BindingFlags::EXPORTED))
            .map(|(slot, _)| slot.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
