//! Provider descriptors.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use mosaic_core::RegistryError;
use once_cell::sync::OnceCell;

use crate::locator::{ProviderLocator, ProviderResolver};

/// One registered implementation and its lazily created instance.
///
/// The instance cell is initialized at most once. Concurrent first callers
/// block on the cell, not on the registry lock, so provider initialization may
/// call back into the registry.
pub(crate) struct ProviderDescriptor<P: ?Sized> {
    locator: ProviderLocator<P>,
    instance: OnceCell<Arc<P>>,
}

impl<P: ?Sized> ProviderDescriptor<P> {
    pub(crate) fn new(locator: ProviderLocator<P>) -> Self {
        Self {
            locator,
            instance: OnceCell::new(),
        }
    }

    pub(crate) fn type_name(&self) -> &str {
        self.locator.type_name()
    }

    pub(crate) fn loaded(&self) -> Option<&Arc<P>> {
        self.instance.get()
    }

    /// The provider instance, constructing it on first use.
    pub(crate) fn instance(
        &self,
        resolver: Option<&dyn ProviderResolver<P>>,
    ) -> Result<Arc<P>, RegistryError> {
        self.instance
            .get_or_try_init(|| self.load(resolver))
            .map(Arc::clone)
    }

    fn load(&self, resolver: Option<&dyn ProviderResolver<P>>) -> Result<Arc<P>, RegistryError> {
        let factory = match &self.locator {
            ProviderLocator::Resolved(factory) => factory.clone(),
            ProviderLocator::Deferred {
                location,
                type_name,
            } => resolver
                .and_then(|r| r.locate(location, type_name))
                .ok_or_else(|| RegistryError::MissingImplementation {
                    type_name: type_name.clone(),
                    location: location.clone(),
                })?,
        };

        log::debug!("instantiating language provider '{}'", self.type_name());

        match panic::catch_unwind(AssertUnwindSafe(|| factory.construct())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(reason)) => Err(RegistryError::InvalidImplementation {
                type_name: self.type_name().to_string(),
                reason,
            }),
            Err(payload) => Err(RegistryError::InvalidImplementation {
                type_name: self.type_name().to_string(),
                reason: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("constructor panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("constructor panicked: {}", s)
    } else {
        "constructor panicked".to_string()
    }
}
