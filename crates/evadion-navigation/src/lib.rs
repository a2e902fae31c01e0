//! Evadion Navigation
//!
//! - Address input classification: local resource, network address or search
//! - Host and display helpers shared by tabs, history and bookmarks
//! - Symbolic (icon font) icon resolution for remote hosts
//! - Capped, deduplicating visit history

mod display;
mod error;
mod history;
mod icons;
mod input;

pub use display::{base_domain, display_short_url, hostname, safe_host, NEW_TAB_TITLE};
pub use error::NavigationError;
pub use history::{
    HistoryEntry, HistoryLimits, HistoryLog, HistoryManager, RecordOutcome, HISTORY_KEY,
};
pub use icons::{
    resolve_brand_icon, AppPage, BrandIcons, IconSet, FALLBACK_ICON_CLASS,
};
pub use input::{
    encode_component, is_local_resource, looks_like_network_address, normalize, InputClassifier,
    InputKind, DEFAULT_HOME_URL, DEFAULT_SEARCH_TEMPLATE,
};

pub type Result<T> = std::result::Result<T, NavigationError>;
