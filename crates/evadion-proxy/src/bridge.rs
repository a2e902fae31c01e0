//! Proxy bridges
//!
//! A bridge rewrites a target before it is loaded into the content frame and
//! maps a loaded frame address back to the URL the user asked for.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use evadion_navigation::is_local_resource;
use evadion_storage::KeyValueStore;

use crate::codec::{UrlCodec, XorCodec};
use crate::config::ProxyConfig;
use crate::registrar::ServiceRegistrar;

/// Cached readiness flag, `"1"` or `"0"`.
pub const READY_KEY: &str = "evadionrv_uv_ready_v1";

pub trait ProxyBridge: Send + Sync {
    /// Address to actually load for `url`.
    fn prepare_for_load(&self, url: &str) -> String;

    /// Original URL behind a loaded frame address, if it was rewritten.
    fn resolve_original(&self, loaded: &str) -> Option<String>;
}

/// Loads everything as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectBridge;

impl ProxyBridge for DirectBridge {
    fn prepare_for_load(&self, url: &str) -> String {
        url.to_string()
    }

    fn resolve_original(&self, _loaded: &str) -> Option<String> {
        None
    }
}

/// Rewrites remote targets to `prefix + codec.encode(url)` once the
/// intermediary serving the prefix is registered.
pub struct PrefixBridge {
    config: ProxyConfig,
    codec: Box<dyn UrlCodec>,
    store: Arc<dyn KeyValueStore>,
    ready: AtomicBool,
}

impl PrefixBridge {
    pub fn new(
        config: ProxyConfig,
        codec: Box<dyn UrlCodec>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            codec,
            store,
            ready: AtomicBool::new(false),
        }
    }

    /// Bridge using the XOR codec
    pub fn with_xor(config: ProxyConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(config, Box::new(XorCodec), store)
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Adopt the readiness flag cached by a previous run.
    pub fn restore_cached_readiness(&self) -> bool {
        let ready = match self.store.get(READY_KEY) {
            Ok(value) => value.as_deref() == Some("1"),
            Err(e) => {
                tracing::debug!(error = %e, "Proxy readiness cache unavailable");
                false
            }
        };
        self.ready.store(ready, Ordering::Release);
        ready
    }

    /// Register the intermediary unless already ready.
    ///
    /// Environments without registration support stay direct. The outcome of
    /// an attempted registration is cached.
    pub async fn ensure_ready(&self, registrar: &dyn ServiceRegistrar) -> bool {
        if self.is_ready() {
            return true;
        }

        if !registrar.is_supported() {
            tracing::debug!("Service registration unsupported, loading directly");
            return false;
        }

        let scope = match self.config.scope() {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!(error = %e, "Proxy scope unavailable");
                return false;
            }
        };

        let ready = match registrar.register(&self.config.worker_script, &scope).await {
            Ok(ready) => ready,
            Err(e) => {
                tracing::warn!(error = %e, scope = %scope, "Proxy registration failed");
                false
            }
        };

        self.ready.store(ready, Ordering::Release);
        self.cache_readiness(ready);

        if ready {
            tracing::info!(scope = %scope, "Proxy ready");
        }
        ready
    }

    fn cache_readiness(&self, ready: bool) {
        let value = if ready { "1" } else { "0" };
        if let Err(e) = self.store.set(READY_KEY, value) {
            tracing::debug!(error = %e, "Proxy readiness not cached");
        }
    }
}

impl ProxyBridge for PrefixBridge {
    fn prepare_for_load(&self, url: &str) -> String {
        if url.is_empty()
            || is_local_resource(url)
            || !self.is_ready()
            || self.config.prefix.is_empty()
        {
            return url.to_string();
        }
        format!("{}{}", self.config.prefix, self.codec.encode(url))
    }

    fn resolve_original(&self, loaded: &str) -> Option<String> {
        let origin = self.config.origin_url().ok()?;
        let prefix_path = self.config.scope().ok()?;
        let parsed = origin.join(loaded).ok()?;

        let rest = parsed.path().strip_prefix(prefix_path.as_str())?;
        let encoded = match parsed.query() {
            Some(query) => format!("{rest}?{query}"),
            None => rest.to_string(),
        };
        self.codec.decode(&encoded)
    }
}
