//! Seams to the content frame and the view

use evadion_tabs::{Tab, ViewMode};

use crate::error::FrameAccessError;

/// Title and icon link read from a loaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub icon_href: Option<String>,
}

/// The embedded browsing context showing the active tab.
pub trait ContentFrame: Send {
    fn load(&mut self, target: &str);

    /// Address of the currently loaded document
    fn current_address(&self) -> Result<String, FrameAccessError>;

    /// `Ok(None)` when no document is attached yet
    fn document_metadata(&self) -> Result<Option<DocumentMeta>, FrameAccessError>;

    fn go_back(&mut self) -> Result<(), FrameAccessError>;
    fn go_forward(&mut self) -> Result<(), FrameAccessError>;
    fn reload(&mut self) -> Result<(), FrameAccessError>;
}

pub trait ViewRenderer: Send {
    fn render_tabs(&mut self, tabs: &[Tab], active_id: Option<&str>);
    fn set_view_mode(&mut self, mode: ViewMode);
    fn set_address(&mut self, url: &str);

    /// Transient notice that the page could not be inspected
    fn show_hint(&mut self);
}
