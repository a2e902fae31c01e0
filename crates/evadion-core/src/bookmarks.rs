//! Bookmarks
//!
//! Unordered tiles on the start page: a name, a target and an optional icon
//! font class. Nothing keeps names or URLs unique.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use evadion_navigation::display_short_url;
use evadion_storage::transfer::{coerce_string, export_envelope, import_entries};
use evadion_storage::KeyValueStore;

use crate::error::CoreError;
use crate::Result;

pub const BOOKMARKS_KEY: &str = "evadionrv_bookmarks_v1";

const COLLECTION: &str = "bookmarks";
const DEFAULT_NAME: &str = "Bookmark";
const DEFAULT_ICON_CLASS: &str = "fa-solid fa-star";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl Bookmark {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_NAME
        } else {
            &self.name
        }
    }

    /// URL opened when the tile is clicked
    pub fn target_url<'a>(&'a self, home_url: &'a str) -> &'a str {
        if self.url.is_empty() {
            home_url
        } else {
            &self.url
        }
    }

    /// Icon font class; bare names get the solid style prefix.
    pub fn icon_class(&self) -> String {
        let v = self.icon.trim();
        if v.is_empty() {
            DEFAULT_ICON_CLASS.to_string()
        } else if v.contains("fa-") {
            v.to_string()
        } else {
            format!("fa-solid {v}")
        }
    }

    pub fn display_url(&self, home_url: &str) -> String {
        display_short_url(self.target_url(home_url))
    }
}

pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            bookmarks: Vec::new(),
        }
    }

    /// Load persisted bookmarks; anything unreadable yields an empty set.
    pub fn load(&mut self) -> usize {
        self.bookmarks = match self.store.get(BOOKMARKS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<Bookmark>(item).ok())
                    .collect(),
                _ => Vec::new(),
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::debug!(error = %e, "Bookmarks unavailable, starting empty");
                Vec::new()
            }
        };
        self.bookmarks.len()
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    /// Add a bookmark, or update the one being edited.
    ///
    /// Declined (returns `None`) when the name or URL is blank, or when the
    /// edited bookmark no longer exists.
    pub fn upsert(
        &mut self,
        editing_id: Option<&str>,
        name: &str,
        url: &str,
        icon: &str,
    ) -> Option<Bookmark> {
        let (name, url, icon) = (name.trim(), url.trim(), icon.trim());
        if name.is_empty() || url.is_empty() {
            return None;
        }

        let saved = match editing_id {
            Some(id) => {
                let existing = self.bookmarks.iter_mut().find(|b| b.id == id)?;
                existing.name = name.to_string();
                existing.url = url.to_string();
                existing.icon = icon.to_string();
                existing.clone()
            }
            None => {
                let bookmark = Bookmark {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    url: url.to_string(),
                    icon: icon.to_string(),
                };
                self.bookmarks.push(bookmark.clone());
                bookmark
            }
        };

        self.persist_quietly();
        tracing::info!(bookmark_id = %saved.id, url = %saved.url, "Saved bookmark");
        Some(saved)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        let removed = self.bookmarks.len() != before;
        if removed {
            self.persist_quietly();
        }
        removed
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(export_envelope(COLLECTION, &self.bookmarks)?)
    }

    /// Replace all bookmarks with those of an exported file.
    ///
    /// Entries missing a name or URL are dropped; missing ids are generated.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let doc: Value = serde_json::from_str(text)?;
        let items = import_entries(doc, COLLECTION)
            .ok_or_else(|| CoreError::MalformedImport(format!("`{COLLECTION}` is not a list")))?;

        self.bookmarks = items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                let id = coerce_string(obj.get("id"));
                Bookmark {
                    id: if id.is_empty() {
                        Uuid::new_v4().to_string()
                    } else {
                        id
                    },
                    name: coerce_string(obj.get("name")),
                    url: coerce_string(obj.get("url")),
                    icon: coerce_string(obj.get("icon")),
                }
            })
            .filter(|b| !b.name.is_empty() && !b.url.is_empty())
            .collect();

        self.persist_quietly();
        tracing::info!(bookmarks = self.bookmarks.len(), "Imported bookmarks");
        Ok(self.bookmarks.len())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.bookmarks)?;
        self.store.set(BOOKMARKS_KEY, &json)?;
        Ok(())
    }

    fn persist_quietly(&self) {
        if let Err(e) = self.persist() {
            tracing::debug!(error = %e, "Bookmarks not persisted");
        }
    }
}
