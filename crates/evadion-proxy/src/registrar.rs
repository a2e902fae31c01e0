//! Background intermediary registration

use async_trait::async_trait;

use crate::Result;

/// Registers the script that intercepts requests under the proxy prefix.
#[async_trait]
pub trait ServiceRegistrar: Send + Sync {
    /// Whether the host environment can register an intermediary at all
    fn is_supported(&self) -> bool;

    /// Register `script` for `scope` and wait until it is active.
    async fn register(&self, script: &str, scope: &str) -> Result<bool>;
}

/// Environment without intermediary support. Navigation stays direct.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRegistrar;

#[async_trait]
impl ServiceRegistrar for UnsupportedRegistrar {
    fn is_supported(&self) -> bool {
        false
    }

    async fn register(&self, _script: &str, _scope: &str) -> Result<bool> {
        Ok(false)
    }
}
