//! ProviderRegistry - identifier to language provider mapping.
//!
//! # Storage Model
//!
//! - **Descriptors**: one per distinct implementation type name, never removed.
//! - **Identifiers**: case-insensitive names and `.ext` aliases, each mapped
//!   to exactly one descriptor. Overriding registrations replace the mapping.
//!
//! # Thread Safety
//!
//! All map mutations and snapshot reads go through one mutex. Instantiating a
//! provider happens after the mutex is released, inside the descriptor's
//! once-cell: third-party initialization code may re-enter the registry, and
//! racing first callers all observe the same instance.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mosaic_registry::{ProviderLocator, ProviderRegistry};
//!
//! let registry: ProviderRegistry<str> = ProviderRegistry::new();
//! registry
//!     .register(
//!         ProviderLocator::resolved("Scheme", || Ok(Arc::from("scheme"))),
//!         false,
//!         &["scheme", ".ss", ".scm"],
//!     )
//!     .unwrap();
//!
//! let a = registry.resolve("Scheme").unwrap();
//! let b = registry.resolve_by_extension("ss").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use std::fmt;
use std::sync::Arc;

use mosaic_core::{ArgumentError, RegistryError};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::descriptor::ProviderDescriptor;
use crate::locator::{ProviderLocator, ProviderResolver};

struct RegistryState<P: ?Sized> {
    descriptors: Vec<Arc<ProviderDescriptor<P>>>,
    /// Implementation type name -> descriptor index.
    by_type: FxHashMap<String, usize>,
    /// Normalized identifier -> descriptor index.
    by_id: FxHashMap<String, usize>,
}

impl<P: ?Sized> RegistryState<P> {
    fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            by_type: FxHashMap::default(),
            by_id: FxHashMap::default(),
        }
    }
}

/// Registry of lazily instantiated language providers.
///
/// Generic over the provider trait object so the registry does not depend on
/// what a provider can do.
pub struct ProviderRegistry<P: ?Sized> {
    state: Mutex<RegistryState<P>>,
    resolver: Option<Arc<dyn ProviderResolver<P>>>,
}

impl<P: ?Sized + Send + Sync + 'static> ProviderRegistry<P> {
    /// A registry that can only instantiate resolved locators.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::new()),
            resolver: None,
        }
    }

    /// A registry that locates deferred implementations through `resolver`.
    pub fn with_resolver(resolver: Arc<dyn ProviderResolver<P>>) -> Self {
        Self {
            state: Mutex::new(RegistryState::new()),
            resolver: Some(resolver),
        }
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register an implementation under `identifiers`.
    ///
    /// Re-registering the same implementation type reuses its descriptor, so
    /// repeating a registration is idempotent. If any identifier already maps
    /// to a different implementation and `override_existing` is false, the call
    /// fails with [`RegistryError::Conflict`] and changes nothing.
    pub fn register(
        &self,
        locator: ProviderLocator<P>,
        override_existing: bool,
        identifiers: &[&str],
    ) -> Result<(), RegistryError> {
        let keys = identifiers
            .iter()
            .map(|id| normalize_identifier(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.state.lock();
        let existing = state.by_type.get(locator.type_name()).copied();

        if !override_existing {
            for key in &keys {
                if let Some(&index) = state.by_id.get(key) {
                    if Some(index) != existing {
                        let err = RegistryError::Conflict {
                            identifier: key.clone(),
                            existing: state.descriptors[index].type_name().to_string(),
                            requested: locator.type_name().to_string(),
                        };
                        log::warn!("{}", err);
                        return Err(err);
                    }
                }
            }
        }

        let index = match existing {
            Some(index) => index,
            None => {
                let index = state.descriptors.len();
                let type_name = locator.type_name().to_string();
                state
                    .descriptors
                    .push(Arc::new(ProviderDescriptor::new(locator)));
                state.by_type.insert(type_name, index);
                index
            }
        };

        for key in keys {
            state.by_id.insert(key, index);
        }

        log::debug!(
            "registered language provider '{}' as [{}]",
            state.descriptors[index].type_name(),
            identifiers.join(", ")
        );
        Ok(())
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// The provider registered under `identifier`, instantiating it on first use.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownLanguage`] if nothing is registered under it
    /// - [`RegistryError::MissingImplementation`] if the implementation cannot be located
    /// - [`RegistryError::InvalidImplementation`] if its constructor fails
    pub fn resolve(&self, identifier: &str) -> Result<Arc<P>, RegistryError> {
        self.try_resolve(identifier)?
            .ok_or_else(|| RegistryError::UnknownLanguage(identifier.to_string()))
    }

    /// Like [`resolve`](Self::resolve), but an unknown identifier is `Ok(None)`.
    ///
    /// Loading failures are still reported as errors.
    pub fn try_resolve(&self, identifier: &str) -> Result<Option<Arc<P>>, RegistryError> {
        let key = normalize_identifier(identifier)?;
        match self.descriptor_for(|state| state.by_id.get(&key).copied()) {
            Some(descriptor) => descriptor.instance(self.resolver.as_deref()).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve by file extension, with or without the leading dot.
    pub fn resolve_by_extension(&self, extension: &str) -> Result<Arc<P>, RegistryError> {
        self.resolve(&extension_key(extension)?)
    }

    /// Resolve by implementation type name.
    pub fn resolve_by_type(&self, type_name: &str) -> Result<Arc<P>, RegistryError> {
        let descriptor = self
            .descriptor_for(|state| state.by_type.get(type_name).copied())
            .ok_or_else(|| RegistryError::UnknownLanguage(type_name.to_string()))?;
        descriptor.instance(self.resolver.as_deref())
    }

    /// Copy a descriptor handle out under the lock; the lock is released on return.
    fn descriptor_for(
        &self,
        find: impl FnOnce(&RegistryState<P>) -> Option<usize>,
    ) -> Option<Arc<ProviderDescriptor<P>>> {
        let state = self.state.lock();
        find(&state).map(|index| Arc::clone(&state.descriptors[index]))
    }

    // ==========================================================================
    // Snapshots
    // ==========================================================================

    /// Sorted snapshot of registered identifiers.
    ///
    /// `filter_by_type` keeps only identifiers of that implementation;
    /// `extensions_only` keeps only `.ext` aliases.
    pub fn list_identifiers(&self, filter_by_type: Option<&str>, extensions_only: bool) -> Vec<String> {
        let state = self.state.lock();
        let wanted = match filter_by_type {
            Some(type_name) => match state.by_type.get(type_name) {
                Some(&index) => Some(index),
                None => return Vec::new(),
            },
            None => None,
        };

        let mut ids: Vec<String> = state
            .by_id
            .iter()
            .filter(|(id, _)| !extensions_only || id.starts_with('.'))
            .filter(|(_, index)| wanted.is_none_or(|w| w == **index))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Sorted snapshot of registered file extensions.
    pub fn list_extensions(&self) -> Vec<String> {
        self.list_identifiers(None, true)
    }

    /// Whether `identifier` is registered.
    pub fn is_registered(&self, identifier: &str) -> bool {
        match normalize_identifier(identifier) {
            Ok(key) => self.state.lock().by_id.contains_key(&key),
            Err(_) => false,
        }
    }

    /// Implementation type name behind `identifier`.
    pub fn type_name_of(&self, identifier: &str) -> Option<String> {
        let key = normalize_identifier(identifier).ok()?;
        self.descriptor_for(|state| state.by_id.get(&key).copied())
            .map(|d| d.type_name().to_string())
    }

    /// Whether the provider behind `identifier` has been instantiated.
    pub fn is_loaded(&self, identifier: &str) -> bool {
        let Ok(key) = normalize_identifier(identifier) else {
            return false;
        };
        self.descriptor_for(|state| state.by_id.get(&key).copied())
            .is_some_and(|d| d.loaded().is_some())
    }

    /// Snapshot of every provider instantiated so far.
    pub fn loaded_providers(&self) -> Vec<Arc<P>> {
        self.state
            .lock()
            .descriptors
            .iter()
            .filter_map(|d| d.loaded().cloned())
            .collect()
    }

    /// Number of distinct implementations.
    pub fn descriptor_count(&self) -> usize {
        self.state.lock().descriptors.len()
    }
}

impl<P: ?Sized + Send + Sync + 'static> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> fmt::Debug for ProviderRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ProviderRegistry")
            .field("descriptors", &state.descriptors.len())
            .field("identifiers", &state.by_id.len())
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Case-fold an identifier, rejecting empty ones and a bare '.'.
fn normalize_identifier(identifier: &str) -> Result<String, ArgumentError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() || trimmed == "." {
        return Err(ArgumentError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Registry key for a file extension: ensure exactly one leading dot.
fn extension_key(extension: &str) -> Result<String, ArgumentError> {
    let bare = extension.trim().trim_start_matches('.');
    if bare.is_empty() {
        return Err(ArgumentError::InvalidIdentifier(extension.to_string()));
    }
    Ok(format!(".{}", bare))
}
