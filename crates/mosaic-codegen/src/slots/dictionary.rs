//! Scope-backed slots.

use std::sync::Arc;

use mosaic_core::{CellSlot, Scope, SlotRef, SlotType, Symbol};

use super::SlotFactory;

/// Allocates slots inside a [`Scope`].
///
/// Asking for a name the scope already holds returns the existing slot, so
/// code compiled against the same scope shares storage.
#[derive(Debug, Clone)]
pub struct DictionarySlotFactory {
    scope: Arc<Scope>,
}

impl DictionarySlotFactory {
    pub fn new(scope: Arc<Scope>) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }
}

impl SlotFactory for DictionarySlotFactory {
    fn create_slot(&self, name: Symbol, slot_type: SlotType) -> SlotRef {
        self.scope
            .slot_or_insert_with(name, || Arc::new(CellSlot::new(name, slot_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::Value;

    #[test]
    fn existing_name_returns_existing_slot() {
        let scope = Scope::new().shared();
        let factory = DictionarySlotFactory::new(Arc::clone(&scope));
        let y = Symbol::intern("y");

        let a = factory.create_slot(y, SlotType::Any);
        let b = factory.create_slot(y, SlotType::Any);
        assert!(Arc::ptr_eq(&a, &b));

        a.set(Value::Int(5)).unwrap();
        assert_eq!(scope.get(y), Some(Value::Int(5)));
    }

    #[test]
    fn reuses_slots_bound_before_the_factory() {
        let scope = Scope::new().shared();
        let z = Symbol::intern("z");
        scope.set(z, Value::Bool(true)).unwrap();

        let factory = DictionarySlotFactory::new(scope);
        assert_eq!(factory.create_slot(z, SlotType::Any).get(), Some(Value::Bool(true)));
    }
}
