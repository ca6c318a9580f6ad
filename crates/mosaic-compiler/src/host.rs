//! Hooks the embedding host receives.

use std::sync::Arc;

use crate::module::Module;

/// Notifications from the module compiler to the embedding host.
pub trait HostEnvironment: Send + Sync {
    /// Called exactly once per module, after it is fully initialized.
    fn module_created(&self, module: &Arc<Module>);
}

/// A host that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl HostEnvironment for NullHost {
    fn module_created(&self, _module: &Arc<Module>) {}
}
