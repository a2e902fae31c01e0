//! Session snapshot persistence
//!
//! Stored as `{"tabs": [...], "activeId": "..."}`. The dragged tab id is
//! transient and never part of the snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use evadion_storage::KeyValueStore;
use evadion_tabs::{Tab, TabList};

use crate::Result;

pub const SESSION_KEY: &str = "evadionrv_tabs_v1";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active_id: Option<String>,
}

impl SessionSnapshot {
    pub fn capture(list: &TabList) -> Self {
        Self {
            tabs: list.tabs().to_vec(),
            active_id: list.active_id().map(str::to_string),
        }
    }

    /// Load the persisted snapshot.
    ///
    /// Unparseable records and tab entries without an id are dropped rather
    /// than reported; only storage failures surface as errors.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let Some(raw) = store.get(SESSION_KEY)? else {
            return Ok(Self::default());
        };

        let doc: Value = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding unreadable session record");
                return Ok(Self::default());
            }
        };

        let tabs = match doc.get("tabs") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value::<Tab>(item.clone()).ok())
                .filter(|tab| !tab.id.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        let active_id = doc
            .get("activeId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(Self { tabs, active_id })
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(SESSION_KEY, &json)?;
        Ok(())
    }

    pub fn clear(store: &dyn KeyValueStore) -> Result<()> {
        store.remove(SESSION_KEY)?;
        Ok(())
    }
}
