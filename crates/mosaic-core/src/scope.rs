//! Symbol to storage mapping.
//!
//! A [`Scope`] is one link of a lookup chain. Each name maps to a [`SlotRef`];
//! the slot may have been pre-allocated by a static slot factory (global
//! linking) or created on demand as a dictionary cell.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::RuntimeError;
use crate::slot::{CellSlot, SlotRef, SlotType};
use crate::symbol::Symbol;
use crate::value::Value;

/// Mutable mapping from symbol to storage location.
///
/// Reads take a shared lock and may run concurrently. Adding names takes the
/// exclusive lock.
#[derive(Default)]
pub struct Scope {
    bindings: RwLock<FxHashMap<Symbol, SlotRef>>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope pre-populated with slots.
    ///
    /// If two slots share a name, the first one is kept.
    pub fn with_slots(slots: impl IntoIterator<Item = SlotRef>) -> Self {
        let mut bindings = FxHashMap::default();
        for slot in slots {
            bindings.entry(slot.name()).or_insert(slot);
        }
        Self {
            bindings: RwLock::new(bindings),
        }
    }

    /// Wrap in an `Arc` for sharing with a module or context.
    pub fn shared(self) -> Arc<Scope> {
        Arc::new(self)
    }

    /// The slot bound to `name`, whether or not it holds a value.
    pub fn slot(&self, name: Symbol) -> Option<SlotRef> {
        self.bindings.read().get(&name).cloned()
    }

    /// Install `slot` under its own name, returning the slot it replaced.
    pub fn bind_slot(&self, slot: SlotRef) -> Option<SlotRef> {
        self.bindings.write().insert(slot.name(), slot)
    }

    /// The slot for `name`, creating it with `create` if absent.
    pub fn slot_or_insert_with(&self, name: Symbol, create: impl FnOnce() -> SlotRef) -> SlotRef {
        if let Some(slot) = self.slot(name) {
            return slot;
        }
        self.bindings.write().entry(name).or_insert_with(create).clone()
    }

    /// Current value of `name` in this scope only.
    pub fn get(&self, name: Symbol) -> Option<Value> {
        self.slot(name).and_then(|slot| slot.get())
    }

    /// Assign `name`, creating an untyped cell if the name is new.
    pub fn set(&self, name: Symbol, value: Value) -> Result<(), RuntimeError> {
        let slot = self.slot_or_insert_with(name, || Arc::new(CellSlot::new(name, SlotType::Any)));
        slot.set(value)
    }

    /// Whether a slot exists for `name`.
    pub fn contains(&self, name: Symbol) -> bool {
        self.bindings.read().contains_key(&name)
    }

    /// Whether `name` has a slot that currently holds a value.
    pub fn is_bound(&self, name: Symbol) -> bool {
        self.slot(name).is_some_and(|slot| slot.is_bound())
    }

    /// Remove the slot for `name`.
    pub fn remove(&self, name: Symbol) -> Option<SlotRef> {
        self.bindings.write().remove(&name)
    }

    /// Snapshot of all names, sorted by text.
    pub fn names(&self) -> Vec<Symbol> {
        let mut names: Vec<Symbol> = self.bindings.read().keys().copied().collect();
        names.sort_by_key(|s| s.as_str());
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn set_then_get() {
        let scope = Scope::new();
        let x = Symbol::intern("x");
        assert!(scope.get(x).is_none());

        scope.set(x, Value::Int(7)).unwrap();
        assert_eq!(scope.get(x), Some(Value::Int(7)));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn set_goes_through_existing_slot() {
        let scope = Scope::new();
        let n = Symbol::intern("n");
        let slot: SlotRef = Arc::new(CellSlot::new(n, SlotType::Of(ValueKind::Int)));
        scope.bind_slot(slot.clone());

        scope.set(n, Value::Int(1)).unwrap();
        assert_eq!(slot.get(), Some(Value::Int(1)));
        assert!(scope.set(n, Value::Bool(true)).is_err());
    }

    #[test]
    fn unassigned_slot_is_not_bound() {
        let scope = Scope::new();
        let g = Symbol::intern("g");
        scope.bind_slot(Arc::new(CellSlot::new(g, SlotType::Any)));
        assert!(scope.contains(g));
        assert!(!scope.is_bound(g));
    }

    #[test]
    fn with_slots_keeps_first() {
        let a = Symbol::intern("a");
        let first: SlotRef = Arc::new(CellSlot::with_value(a, Value::Int(1)));
        let second: SlotRef = Arc::new(CellSlot::with_value(a, Value::Int(2)));
        let scope = Scope::with_slots([first, second]);
        assert_eq!(scope.get(a), Some(Value::Int(1)));
    }

    #[test]
    fn names_are_sorted_snapshot() {
        let scope = Scope::new();
        scope.set(Symbol::intern("zeta"), Value::Nil).unwrap();
        scope.set(Symbol::intern("alpha"), Value::Nil).unwrap();
        let names: Vec<_> = scope.names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
