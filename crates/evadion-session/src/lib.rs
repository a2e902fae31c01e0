//! Evadion Session Management
//!
//! - A session is the ordered tab list plus the active tab id
//! - Every mutation is persisted, then the view is redrawn
//! - The content frame and the view are reached through [`ContentFrame`]
//!   and [`ViewRenderer`] so the state machine runs without a page
//! - Frame loads are folded back into the active tab by reconciliation

mod action;
mod controller;
mod error;
mod frame;
mod reconcile;
mod session;

pub use action::{ActionOutcome, SessionAction};
pub use controller::{ControllerOptions, SessionController, BLANK_PAGE};
pub use error::{FrameAccessError, SessionError};
pub use frame::{ContentFrame, DocumentMeta, ViewRenderer};
pub use reconcile::{AddressStage, MetadataStage, ReconcileOutcome};
pub use session::{SessionSnapshot, SESSION_KEY};

pub type Result<T> = std::result::Result<T, SessionError>;
