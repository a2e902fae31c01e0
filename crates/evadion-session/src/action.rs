//! Session actions
//!
//! Every user or frame event the session reacts to, as one enum so a
//! front end can forward events through a single entry point.

use serde::{Deserialize, Serialize};

use evadion_tabs::CloseOutcome;

use crate::reconcile::ReconcileOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionAction {
    CreateTab { url: String },
    CloseTab { id: String },
    Activate { id: String },
    MoveTab { from: String, to: String },
    Navigate {
        url: String,
        #[serde(default)]
        silent: bool,
    },
    /// Address bar submission, normalized before navigating
    SubmitAddress { input: String },
    FrameLoaded,
    CloseAll,
    Back,
    Forward,
    Reload,
    BeginDrag { id: String },
    DropOn { target: String },
    EndDrag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Created { id: String },
    Closed(CloseOutcome),
    Activated,
    Moved,
    Navigated,
    Reconciled(ReconcileOutcome),
    ClearedAll,
    FrameCommand,
    DragStarted,
    DragEnded,
    /// Unknown ids, no active tab, or a no-op move
    Ignored,
}
