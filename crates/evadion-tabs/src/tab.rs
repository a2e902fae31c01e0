//! Tab data structure
//!
//! A tab shows:
//! - Favicon, when the loaded document exposed one
//! - Otherwise a symbolic icon derived from the host
//! - Title (app page name, document title or host)

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use evadion_navigation::{
    is_local_resource, resolve_brand_icon, safe_host, AppPage, IconSet, FALLBACK_ICON_CLASS,
    NEW_TAB_TITLE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Unique identifier, stable for the tab's lifetime
    pub id: String,
    /// Current target (absolute URL or local path)
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Icon reference observed in the loaded document
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub favicon: Option<String>,
    /// Icon font class derived from the URL
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub fa_icon: Option<String>,
}

/// Title and symbolic icon derived from a URL alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub title: String,
    pub fa_icon: Option<String>,
}

/// App pages get their fixed label; other targets use the host, plus a
/// brand icon for remote URLs.
pub fn derive_label(url: &str, icons: &dyn IconSet) -> TabLabel {
    if let Some(page) = AppPage::detect(url) {
        return TabLabel {
            title: page.title().to_string(),
            fa_icon: Some(page.icon_class().to_string()),
        };
    }

    let fa_icon = if is_local_resource(url) {
        None
    } else {
        resolve_brand_icon(url, icons)
    };

    TabLabel {
        title: safe_host(url),
        fa_icon,
    }
}

impl Tab {
    pub fn new(url: String, icons: &dyn IconSet) -> Self {
        let label = derive_label(&url, icons);
        Self {
            id: Uuid::new_v4().to_string(),
            url,
            title: label.title,
            favicon: None,
            fa_icon: label.fa_icon,
        }
    }

    /// Point the tab at `url` with a freshly derived label.
    pub fn relabel(&mut self, url: String, icons: &dyn IconSet) {
        let label = derive_label(&url, icons);
        self.url = url;
        self.title = label.title;
        self.fa_icon = label.fa_icon;
        self.favicon = None;
    }

    /// Like [`Tab::relabel`], but keeps the current symbolic icon when none
    /// can be derived for the new URL.
    pub fn relabel_keeping_icon(&mut self, url: String, icons: &dyn IconSet) {
        let previous = self.fa_icon.take();
        self.relabel(url, icons);
        if self.fa_icon.is_none() {
            self.fa_icon = previous;
        }
    }

    /// Re-derive title and icon for the current URL without touching it.
    ///
    /// Returns whether anything changed.
    pub fn refresh_label(&mut self, icons: &dyn IconSet) -> bool {
        let label = derive_label(&self.url, icons);
        let fa_icon = label.fa_icon.or_else(|| self.fa_icon.clone());
        let changed = label.title != self.title || fa_icon != self.fa_icon;
        self.title = label.title;
        self.fa_icon = fa_icon;
        changed
    }

    /// Title with fallback for tabs that never got one
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            NEW_TAB_TITLE
        } else {
            &self.title
        }
    }

    /// Icon font class to show when no favicon is available
    pub fn display_icon(&self) -> &str {
        self.fa_icon.as_deref().unwrap_or(FALLBACK_ICON_CLASS)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evadion_navigation::BrandIcons;

    #[test]
    fn test_new_remote_tab() {
        let icons = BrandIcons::new();
        let tab = Tab::new("https://www.youtube.com/watch?v=1".to_string(), &icons);
        assert_eq!(tab.title, "youtube.com");
        assert_eq!(tab.fa_icon.as_deref(), Some("fa-brands fa-youtube"));
        assert!(tab.favicon.is_none());
        assert_eq!(tab.id.len(), 36);
    }

    #[test]
    fn test_app_page_labels() {
        let icons = BrandIcons::new();
        let games = Tab::new("games.html".to_string(), &icons);
        assert_eq!(games.title, "Games");
        assert_eq!(games.display_icon(), "fa-solid fa-gamepad");

        let local = Tab::new("/notes/index.html".to_string(), &icons);
        assert_eq!(local.title, NEW_TAB_TITLE);
        assert!(local.fa_icon.is_none());
        assert_eq!(local.display_icon(), FALLBACK_ICON_CLASS);
    }

    #[test]
    fn test_unique_ids() {
        let icons = BrandIcons::new();
        let a = Tab::new("https://a.com".to_string(), &icons);
        let b = Tab::new("https://a.com".to_string(), &icons);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_relabel_clears_favicon() {
        let icons = BrandIcons::new();
        let mut tab = Tab::new("https://github.com".to_string(), &icons);
        tab.favicon = Some("https://github.com/favicon.ico".to_string());

        tab.relabel("https://example.com".to_string(), &icons);
        assert_eq!(tab.url, "https://example.com");
        assert_eq!(tab.title, "example.com");
        assert!(tab.fa_icon.is_none());
        assert!(tab.favicon.is_none());
    }

    #[test]
    fn test_relabel_keeping_icon() {
        let icons = BrandIcons::new();
        let mut tab = Tab::new("https://github.com".to_string(), &icons);

        tab.relabel_keeping_icon("https://example.com".to_string(), &icons);
        assert_eq!(tab.fa_icon.as_deref(), Some("fa-brands fa-github"));

        tab.relabel_keeping_icon("https://reddit.com/r/rust".to_string(), &icons);
        assert_eq!(tab.fa_icon.as_deref(), Some("fa-brands fa-reddit"));
    }

    #[test]
    fn test_refresh_label_reports_changes() {
        let icons = BrandIcons::new();
        let mut tab = Tab::new("https://example.com".to_string(), &icons);
        assert!(!tab.refresh_label(&icons));

        tab.title = "Example Domain".to_string();
        assert!(tab.refresh_label(&icons));
        assert_eq!(tab.title, "example.com");
    }

    #[test]
    fn test_display_title_fallback() {
        let icons = BrandIcons::new();
        let mut tab = Tab::new("https://example.com".to_string(), &icons);
        tab.title.clear();
        assert_eq!(tab.display_title(), NEW_TAB_TITLE);
    }

    #[test]
    fn test_serde_camel_case_and_empty_icons() {
        let tab: Tab = serde_json::from_str(
            r#"{"id":"t1","url":"https://a.com","title":"A","favicon":"","faIcon":""}"#,
        )
        .unwrap();
        assert!(tab.favicon.is_none());
        assert!(tab.fa_icon.is_none());

        let icons = BrandIcons::new();
        let github = Tab::new("https://github.com".to_string(), &icons);
        let json = serde_json::to_string(&github).unwrap();
        assert!(json.contains("\"faIcon\":\"fa-brands fa-github\""));
        assert!(!json.contains("favicon"));
    }
}
