//! History management
//!
//! Append-ordered visit log, capped, with short-window deduplication of
//! repeated visits to the same URL.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use evadion_storage::transfer::{coerce_string, export_envelope, import_entries};
use evadion_storage::KeyValueStore;

use crate::display::safe_host;
use crate::error::NavigationError;
use crate::Result;

pub const HISTORY_KEY: &str = "evadionrv_history_v1";

const COLLECTION: &str = "history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Visit time, milliseconds since the Unix epoch
    #[serde(rename = "t", alias = "timestamp")]
    pub timestamp: i64,
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryLimits {
    /// Oldest entries are evicted beyond this count
    pub max_entries: usize,
    /// Repeat visits to the last URL within this window are merged
    pub dedup_window_ms: i64,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_entries: 400,
            dedup_window_ms: 2_500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Blank or empty URL, nothing recorded
    Ignored,
    /// Folded into the previous entry
    Merged,
    Appended,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    limits: HistoryLimits,
}

impl HistoryLog {
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            entries: Vec::new(),
            limits,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    /// Record a visit at `now` (ms since epoch).
    pub fn record_at(&mut self, url: &str, title: &str, now: i64) -> RecordOutcome {
        let url = url.trim();
        if url.is_empty() || url == "about:blank" {
            return RecordOutcome::Ignored;
        }

        let title = title.trim();

        if let Some(last) = self.entries.last_mut() {
            if last.url == url
                && now.saturating_sub(last.timestamp) < self.limits.dedup_window_ms
            {
                if !title.is_empty() && last.title.is_empty() {
                    last.title = title.to_string();
                }
                last.timestamp = now;
                return RecordOutcome::Merged;
            }
        }

        let title = if title.is_empty() {
            safe_host(url)
        } else {
            title.to_string()
        };

        self.entries.push(HistoryEntry {
            timestamp: now,
            url: url.to_string(),
            title,
        });
        self.enforce_cap();

        RecordOutcome::Appended
    }

    pub fn record(&mut self, url: &str, title: &str) -> RecordOutcome {
        self.record_at(url, title, Utc::now().timestamp_millis())
    }

    /// Newest-first entries whose title or URL contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let q = query.trim().to_lowercase();
        self.entries
            .iter()
            .rev()
            .filter(|entry| {
                q.is_empty()
                    || entry.title.to_lowercase().contains(&q)
                    || entry.url.to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Remove the first entry equal to `entry`.
    pub fn remove(&mut self, entry: &HistoryEntry) -> bool {
        match self.entries.iter().position(|e| e == entry) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the log, keeping only the newest `max_entries`.
    pub fn replace(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        if self.entries.len() > self.limits.max_entries {
            let overflow = self.entries.len() - self.limits.max_entries;
            self.entries.drain(0..overflow);
        }
    }
}

/// History log bound to its persisted record.
pub struct HistoryManager {
    store: Arc<dyn KeyValueStore>,
    log: HistoryLog,
}

impl HistoryManager {
    pub fn new(store: Arc<dyn KeyValueStore>, limits: HistoryLimits) -> Self {
        Self {
            store,
            log: HistoryLog::new(limits),
        }
    }

    /// Load persisted history. Missing or unreadable data yields an empty log.
    pub fn load(&mut self) -> usize {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.log.clear();
                return 0;
            }
            Err(e) => {
                tracing::debug!(error = %e, "History unavailable, starting empty");
                self.log.clear();
                return 0;
            }
        };

        let entries = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|doc| import_entries(doc, COLLECTION))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| serde_json::from_value::<HistoryEntry>(value).ok())
            .collect();

        self.log.replace(entries);
        tracing::debug!(entries = self.log.len(), "Loaded history");
        self.log.len()
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.log.entries()
    }

    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        self.log.search(query)
    }

    /// Record a visit and persist it
    pub fn record(&mut self, url: &str, title: &str) -> RecordOutcome {
        self.record_at(url, title, Utc::now().timestamp_millis())
    }

    pub fn record_at(&mut self, url: &str, title: &str, now: i64) -> RecordOutcome {
        let outcome = self.log.record_at(url, title, now);
        if outcome != RecordOutcome::Ignored {
            self.persist_quietly();
        }
        outcome
    }

    pub fn remove(&mut self, entry: &HistoryEntry) -> bool {
        let removed = self.log.remove(entry);
        if removed {
            self.persist_quietly();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.log.clear();
        self.persist_quietly();
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(export_envelope(COLLECTION, self.log.entries())?)
    }

    /// Replace history with the entries of an exported file.
    ///
    /// Accepts the bare array or the export envelope. Malformed entries are
    /// dropped; the rest are kept.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let doc: Value = serde_json::from_str(text)?;
        let items = import_entries(doc, COLLECTION).ok_or_else(|| {
            NavigationError::MalformedImport(format!("`{COLLECTION}` is not a list"))
        })?;

        let now = Utc::now().timestamp_millis();
        let cleaned: Vec<HistoryEntry> = items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| HistoryEntry {
                timestamp: coerce_timestamp(obj.get("t").or_else(|| obj.get("timestamp")))
                    .unwrap_or(now),
                url: coerce_string(obj.get("url")),
                title: coerce_string(obj.get("title")),
            })
            .filter(|entry| !entry.url.is_empty())
            .collect();

        self.log.replace(cleaned);
        self.persist_quietly();

        tracing::info!(entries = self.log.len(), "Imported history");
        Ok(self.log.len())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self.log.entries())?;
        self.store.set(HISTORY_KEY, &json)?;
        Ok(())
    }

    fn persist_quietly(&self) {
        if let Err(e) = self.persist() {
            tracing::debug!(error = %e, "History not persisted");
        }
    }
}

// Well inside i64 and exactly representable as f64
const MAX_FLOAT_TIMESTAMP: f64 = 9_007_199_254_740_992.0;

/// Zero, non-numeric and out-of-range values count as missing.
fn coerce_timestamp(value: Option<&Value>) -> Option<i64> {
    let ts = match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < MAX_FLOAT_TIMESTAMP)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (ts != 0).then_some(ts)
}
