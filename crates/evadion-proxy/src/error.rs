//! Proxy error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Invalid proxy origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),

    #[error("Proxy prefix is empty")]
    MissingPrefix,

    #[error("Service registration failed: {0}")]
    Registration(String),
}
