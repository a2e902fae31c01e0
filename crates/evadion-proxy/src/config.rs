//! Proxy configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProxyError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path prefix the intermediary intercepts
    pub prefix: String,
    /// Origin the page is served from; relative addresses resolve against it
    pub origin: String,
    /// Script registered as the background intermediary
    pub worker_script: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/service/".to_string(),
            origin: "http://localhost:8080".to_string(),
            worker_script: "/sw.js".to_string(),
        }
    }
}

impl ProxyConfig {
    pub fn origin_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.origin)?)
    }

    /// Path component of the prefix resolved against the origin.
    pub fn scope(&self) -> Result<String> {
        if self.prefix.is_empty() {
            return Err(ProxyError::MissingPrefix);
        }
        Ok(self.origin_url()?.join(&self.prefix)?.path().to_string())
    }
}
