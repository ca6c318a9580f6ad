//! How a provider implementation is found and constructed.
//!
//! A registration names its implementation either with a ready
//! [`ProviderFactory`] (the implementation is linked into the host) or with a
//! deferred `(location, type_name)` pair that a host-supplied
//! [`ProviderResolver`] turns into a factory on first use.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Constructor signature behind a [`ProviderFactory`].
pub type ConstructFn<P> = dyn Fn() -> Result<Arc<P>, String> + Send + Sync;

/// A resolved implementation handle: a type name plus its constructor.
pub struct ProviderFactory<P: ?Sized> {
    type_name: Arc<str>,
    construct: Arc<ConstructFn<P>>,
}

impl<P: ?Sized> ProviderFactory<P> {
    /// Wrap a fallible constructor.
    pub fn new<F>(type_name: impl AsRef<str>, construct: F) -> Self
    where
        F: Fn() -> Result<Arc<P>, String> + Send + Sync + 'static,
    {
        Self {
            type_name: Arc::from(type_name.as_ref()),
            construct: Arc::new(construct),
        }
    }

    /// The implementation's type name; its identity in the registry.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Run the constructor.
    pub fn construct(&self) -> Result<Arc<P>, String> {
        (self.construct)()
    }
}

impl<P: ?Sized> Clone for ProviderFactory<P> {
    fn clone(&self) -> Self {
        Self {
            type_name: Arc::clone(&self.type_name),
            construct: Arc::clone(&self.construct),
        }
    }
}

impl<P: ?Sized> fmt::Debug for ProviderFactory<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderFactory")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Names one provider implementation.
pub enum ProviderLocator<P: ?Sized> {
    /// The implementation is already available.
    Resolved(ProviderFactory<P>),
    /// The implementation is located lazily through the registry's resolver.
    Deferred { location: String, type_name: String },
}

impl<P: ?Sized> ProviderLocator<P> {
    /// A deferred locator.
    pub fn deferred(location: impl Into<String>, type_name: impl Into<String>) -> Self {
        ProviderLocator::Deferred {
            location: location.into(),
            type_name: type_name.into(),
        }
    }

    /// A resolved locator from a constructor.
    pub fn resolved<F>(type_name: impl AsRef<str>, construct: F) -> Self
    where
        F: Fn() -> Result<Arc<P>, String> + Send + Sync + 'static,
    {
        ProviderLocator::Resolved(ProviderFactory::new(type_name, construct))
    }

    /// The implementation type name.
    pub fn type_name(&self) -> &str {
        match self {
            ProviderLocator::Resolved(factory) => factory.type_name(),
            ProviderLocator::Deferred { type_name, .. } => type_name,
        }
    }

    /// Where the implementation lives, for deferred locators.
    pub fn location(&self) -> Option<&str> {
        match self {
            ProviderLocator::Resolved(_) => None,
            ProviderLocator::Deferred { location, .. } => Some(location),
        }
    }
}

impl<P: ?Sized> Clone for ProviderLocator<P> {
    fn clone(&self) -> Self {
        match self {
            ProviderLocator::Resolved(factory) => ProviderLocator::Resolved(factory.clone()),
            ProviderLocator::Deferred {
                location,
                type_name,
            } => ProviderLocator::Deferred {
                location: location.clone(),
                type_name: type_name.clone(),
            },
        }
    }
}

impl<P: ?Sized> fmt::Debug for ProviderLocator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderLocator::Resolved(factory) => {
                f.debug_tuple("Resolved").field(&factory.type_name()).finish()
            }
            ProviderLocator::Deferred {
                location,
                type_name,
            } => f
                .debug_struct("Deferred")
                .field("location", location)
                .field("type_name", type_name)
                .finish(),
        }
    }
}

/// Host-supplied loading mechanism for deferred locators.
///
/// Returning `None` means the implementation cannot be located; the registry
/// reports that as `RegistryError::MissingImplementation`.
pub trait ProviderResolver<P: ?Sized>: Send + Sync {
    fn locate(&self, location: &str, type_name: &str) -> Option<ProviderFactory<P>>;
}

/// A compiled-in table of factories keyed by `(location, type_name)`.
pub struct StaticResolver<P: ?Sized> {
    table: RwLock<FxHashMap<(String, String), ProviderFactory<P>>>,
}

impl<P: ?Sized> StaticResolver<P> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(FxHashMap::default()),
        }
    }

    /// Add a factory reachable under `location`.
    pub fn insert(&self, location: impl Into<String>, factory: ProviderFactory<P>) {
        let key = (location.into(), factory.type_name().to_string());
        self.table.write().insert(key, factory);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, location: impl Into<String>, factory: ProviderFactory<P>) -> Self {
        self.insert(location, factory);
        self
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}

impl<P: ?Sized> Default for StaticResolver<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized + Send + Sync> ProviderResolver<P> for StaticResolver<P> {
    fn locate(&self, location: &str, type_name: &str) -> Option<ProviderFactory<P>> {
        self.table
            .read()
            .get(&(location.to_string(), type_name.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_type_name() {
        let deferred: ProviderLocator<str> = ProviderLocator::deferred("libscheme", "Scheme");
        assert_eq!(deferred.type_name(), "Scheme");
        assert_eq!(deferred.location(), Some("libscheme"));

        let resolved: ProviderLocator<str> =
            ProviderLocator::resolved("Lua", || Ok(Arc::from("lua")));
        assert_eq!(resolved.type_name(), "Lua");
        assert_eq!(resolved.location(), None);
    }

    #[test]
    fn static_resolver_matches_location_and_type() {
        let resolver: StaticResolver<str> = StaticResolver::new()
            .with("pkg", ProviderFactory::new("A", || Ok(Arc::from("a"))));
        assert_eq!(resolver.len(), 1);
        assert!(resolver.locate("pkg", "A").is_some());
        assert!(resolver.locate("other", "A").is_none());
        assert!(resolver.locate("pkg", "B").is_none());
    }

    #[test]
    fn factory_construct() {
        let factory: ProviderFactory<str> = ProviderFactory::new("Bad", || Err("boom".into()));
        assert_eq!(factory.construct().unwrap_err(), "boom");
        assert!(format!("{:?}", factory).contains("Bad"));
    }
}
