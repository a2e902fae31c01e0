//! Ordered tab list with an active pointer
//!
//! Invariant: when the list is non-empty exactly one tab id equals
//! `active_id`; when it is empty `active_id` is `None`.

use crate::error::TabError;
use crate::tab::Tab;
use crate::Result;

/// What closing a tab did to the active pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The last tab was closed
    Emptied,
    /// The active tab was closed and a neighbour took over
    ActivatedNeighbor { id: String },
    /// A background tab was closed
    Background,
}

#[derive(Debug, Clone, Default)]
pub struct TabList {
    tabs: Vec<Tab>,
    active_id: Option<String>,
    /// Tab currently being dragged in the strip, never persisted
    dragging_id: Option<String>,
}

impl TabList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Tab> {
        let id = self.active_id.as_deref()?;
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active_id.as_deref()?;
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    /// Append a tab and make it active
    pub fn push_active(&mut self, tab: Tab) -> &Tab {
        self.active_id = Some(tab.id.clone());
        self.tabs.push(tab);
        &self.tabs[self.tabs.len() - 1]
    }

    /// Remove a tab. Returns `None` for unknown ids.
    ///
    /// Closing the active tab activates the tab now at the closed index, or
    /// the last one when the closed tab was last.
    pub fn remove(&mut self, id: &str) -> Option<CloseOutcome> {
        let idx = self.index_of(id)?;
        self.tabs.remove(idx);

        if self.tabs.is_empty() {
            self.active_id = None;
            self.clear_drag_of(id);
            return Some(CloseOutcome::Emptied);
        }

        self.clear_drag_of(id);

        if self.active_id.as_deref() != Some(id) {
            return Some(CloseOutcome::Background);
        }

        let next = idx.min(self.tabs.len() - 1);
        let next_id = self.tabs[next].id.clone();
        self.active_id = Some(next_id.clone());
        Some(CloseOutcome::ActivatedNeighbor { id: next_id })
    }

    pub fn activate(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(TabError::NotFound(id.to_string()));
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// Move `from_id` to the index currently held by `to_id`.
    ///
    /// Returns `Ok(false)` when both ids are the same tab.
    pub fn move_tab(&mut self, from_id: &str, to_id: &str) -> Result<bool> {
        let from = self
            .index_of(from_id)
            .ok_or_else(|| TabError::NotFound(from_id.to_string()))?;
        let to = self
            .index_of(to_id)
            .ok_or_else(|| TabError::NotFound(to_id.to_string()))?;

        if from == to {
            return Ok(false);
        }

        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        Ok(true)
    }

    /// Replace the contents with restored tabs.
    ///
    /// A missing or unknown active id is repaired to the first tab. Returns
    /// whether a repair happened.
    pub fn restore(&mut self, tabs: Vec<Tab>, active_id: Option<String>) -> bool {
        self.tabs = tabs;
        self.dragging_id = None;

        let valid = active_id.filter(|id| self.contains(id));
        let repaired = valid.is_none() && !self.tabs.is_empty();
        self.active_id = valid.or_else(|| self.tabs.first().map(|t| t.id.clone()));
        repaired
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active_id = None;
        self.dragging_id = None;
    }

    pub fn begin_drag(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.dragging_id = Some(id.to_string());
        true
    }

    pub fn dragging_id(&self) -> Option<&str> {
        self.dragging_id.as_deref()
    }

    pub fn take_dragging(&mut self) -> Option<String> {
        self.dragging_id.take()
    }

    pub fn end_drag(&mut self) {
        self.dragging_id = None;
    }

    fn clear_drag_of(&mut self, id: &str) {
        if self.dragging_id.as_deref() == Some(id) {
            self.dragging_id = None;
        }
    }
}
