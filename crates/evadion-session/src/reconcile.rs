//! Frame load reconciliation
//!
//! After the frame finishes loading, the active tab is brought in line with
//! what the frame actually shows:
//! 1. Address stage: follow in-frame navigation (decoding proxied addresses)
//! 2. Metadata stage: adopt the document's title and icon link when readable

use evadion_navigation::{IconSet, RecordOutcome};
use evadion_proxy::ProxyBridge;
use evadion_tabs::Tab;

use crate::frame::ContentFrame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressStage {
    /// The frame's location could not be read
    Unreadable,
    Unchanged,
    /// The tab now points at `url`
    Relabeled { url: String },
}

impl AddressStage {
    pub fn changed(&self) -> bool {
        matches!(self, AddressStage::Relabeled { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataStage {
    /// No document attached
    NoDocument,
    /// Document values applied; flags tell which were present
    Applied { title: bool, favicon: bool },
    /// Document unreadable, label re-derived from the URL
    Fallback { changed: bool },
}

impl MetadataStage {
    pub fn changed(&self) -> bool {
        match self {
            MetadataStage::NoDocument => false,
            MetadataStage::Applied { title, favicon } => *title || *favicon,
            MetadataStage::Fallback { changed } => *changed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub address: AddressStage,
    pub metadata: MetadataStage,
    pub history: RecordOutcome,
}

impl ReconcileOutcome {
    /// Whether the tab was persisted and redrawn (otherwise the hint was shown)
    pub fn changed(&self) -> bool {
        self.address.changed() || self.metadata.changed()
    }
}

pub(crate) fn address_stage(
    tab: &mut Tab,
    frame: &dyn ContentFrame,
    bridge: &dyn ProxyBridge,
    icons: &dyn IconSet,
) -> AddressStage {
    let loaded = match frame.current_address() {
        Ok(address) => address,
        Err(e) => {
            tracing::debug!(tab_id = %tab.id, error = %e, "Frame address unreadable");
            return AddressStage::Unreadable;
        }
    };

    let address = bridge.resolve_original(&loaded).unwrap_or(loaded);
    if address.is_empty() || address == tab.url {
        return AddressStage::Unchanged;
    }

    tab.relabel_keeping_icon(address.clone(), icons);
    AddressStage::Relabeled { url: address }
}

pub(crate) fn metadata_stage(
    tab: &mut Tab,
    frame: &dyn ContentFrame,
    icons: &dyn IconSet,
) -> MetadataStage {
    match frame.document_metadata() {
        Ok(None) => MetadataStage::NoDocument,
        Ok(Some(meta)) => {
            let title = meta
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            let favicon = meta.icon_href.filter(|href| !href.is_empty());

            let applied = MetadataStage::Applied {
                title: title.is_some(),
                favicon: favicon.is_some(),
            };
            if let Some(title) = title {
                tab.title = title;
            }
            if let Some(favicon) = favicon {
                tab.favicon = Some(favicon);
            }
            applied
        }
        Err(e) => {
            tracing::debug!(tab_id = %tab.id, error = %e, "Document unreadable, deriving label");
            MetadataStage::Fallback {
                changed: tab.refresh_label(icons),
            }
        }
    }
}
