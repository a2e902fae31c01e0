//! Evadion Proxy Bridge
//!
//! Remote targets can be routed through a same-origin rewriting proxy:
//! - `prefix + encode(url)` is loaded instead of `url`
//! - loaded addresses under the prefix decode back to the original URL
//! - rewriting only starts once the background intermediary is registered

mod bridge;
mod codec;
mod config;
mod error;
mod registrar;

pub use bridge::{DirectBridge, PrefixBridge, ProxyBridge, READY_KEY};
pub use codec::{PlainCodec, UrlCodec, XorCodec};
pub use config::ProxyConfig;
pub use error::ProxyError;
pub use registrar::{ServiceRegistrar, UnsupportedRegistrar};

pub type Result<T> = std::result::Result<T, ProxyError>;
