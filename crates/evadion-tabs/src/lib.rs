//! Evadion Tab Management
//!
//! Tabs are lightweight records rendered inside a single page: an id, the
//! target they show and the label (title plus icon) derived from it. The
//! ordered list keeps exactly one active tab whenever it is non-empty.

mod error;
mod list;
mod state;
mod tab;

pub use error::TabError;
pub use list::{CloseOutcome, TabList};
pub use state::ViewMode;
pub use tab::{derive_label, Tab, TabLabel};

pub type Result<T> = std::result::Result<T, TabError>;
