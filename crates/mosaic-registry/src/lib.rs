//! Mosaic Registry
//!
//! Discovers, lazily loads and memoizes language provider implementations.
//!
//! - [`ProviderRegistry`]: identifier / extension to provider mapping
//! - [`ProviderLocator`]: names an implementation, resolved or deferred
//! - [`ProviderResolver`]: host hook that locates deferred implementations
//! - [`StaticResolver`]: a compiled-in resolver table
//!
//! The registry is generic over the provider trait object, so this crate knows
//! nothing about compilation. `mosaic-compiler` instantiates it with
//! `dyn LanguageProvider`.

mod descriptor;
pub mod locator;
mod registry;

pub use locator::{ConstructFn, ProviderFactory, ProviderLocator, ProviderResolver, StaticResolver};
pub use registry::ProviderRegistry;
