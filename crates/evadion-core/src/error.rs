//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] evadion_storage::StorageError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] evadion_navigation::NavigationError),

    #[error("Tab error: {0}")]
    Tab(#[from] evadion_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] evadion_session::SessionError),

    #[error("Proxy error: {0}")]
    Proxy(#[from] evadion_proxy::ProxyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed import: {0}")]
    MalformedImport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
