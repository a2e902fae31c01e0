//! Evadion Core
//!
//! Application container for the Evadion tabbed shell.
//! State lives here; the content frame and the view only display it.

mod bookmarks;
mod browser;
mod config;
mod error;

pub use bookmarks::{Bookmark, BookmarkStore, BOOKMARKS_KEY};
pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use evadion_navigation::{
    AppPage, BrandIcons, HistoryEntry, HistoryLimits, HistoryManager, IconSet, InputClassifier,
    InputKind, NavigationError, RecordOutcome,
};
pub use evadion_proxy::{
    PrefixBridge, ProxyBridge, ProxyConfig, ProxyError, ServiceRegistrar, UnsupportedRegistrar,
};
pub use evadion_session::{
    ActionOutcome, ContentFrame, DocumentMeta, FrameAccessError, ReconcileOutcome, SessionAction,
    SessionController, SessionError, ViewRenderer,
};
pub use evadion_storage::{Database, KeyValueStore, MemoryStore, StorageError};
pub use evadion_tabs::{CloseOutcome, Tab, TabError, TabList, ViewMode};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
