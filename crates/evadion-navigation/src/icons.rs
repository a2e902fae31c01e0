//! Symbolic icon resolution
//!
//! Remote hosts are mapped onto brand glyphs of the icon font when the font
//! ships one; the two bundled app pages have fixed glyphs.

use std::collections::HashSet;

use crate::display::{base_domain, hostname};

/// Glyph shown when neither a favicon nor a brand icon is known.
pub const FALLBACK_ICON_CLASS: &str = "fa-solid fa-globe";

const DOMAIN_ALIASES: &[(&str, &str)] = &[
    ("youtu.be", "youtube"),
    ("x.com", "x-twitter"),
    ("twitter.com", "x-twitter"),
];

const KNOWN_BRANDS: &[&str] = &[
    "amazon", "android", "apple", "bandcamp", "behance", "bitbucket", "blogger", "discord",
    "dribbble", "dropbox", "ebay", "etsy", "facebook", "figma", "flickr", "github", "gitlab",
    "google", "imdb", "instagram", "linkedin", "mastodon", "medium", "microsoft", "netflix",
    "npm", "paypal", "pinterest", "playstation", "quora", "reddit", "roblox", "rust",
    "shopify", "skype", "slack", "snapchat", "soundcloud", "spotify", "stack-overflow",
    "steam", "telegram", "tiktok", "trello", "tumblr", "twitch", "twitter", "vimeo", "whatsapp",
    "wikipedia-w", "wordpress", "x-twitter", "xbox", "yahoo", "yelp", "youtube",
];

/// Lookup of icon classes the icon font can render.
pub trait IconSet: Send + Sync {
    fn has_class(&self, class: &str) -> bool;
}

/// Brand glyphs bundled with the default icon font.
#[derive(Debug, Clone)]
pub struct BrandIcons {
    classes: HashSet<String>,
}

impl BrandIcons {
    pub fn new() -> Self {
        Self::with_brands(KNOWN_BRANDS.iter().copied())
    }

    pub fn with_brands<'a>(brands: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            classes: brands
                .into_iter()
                .map(|brand| format!("fa-brands fa-{brand}"))
                .collect(),
        }
    }
}

impl Default for BrandIcons {
    fn default() -> Self {
        Self::new()
    }
}

impl IconSet for BrandIcons {
    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Resolve a brand icon class for a remote URL, if the icon set has one.
pub fn resolve_brand_icon(url: &str, icons: &dyn IconSet) -> Option<String> {
    let host = hostname(url);
    if host.is_empty() {
        return None;
    }

    let base = base_domain(&host);
    let label = alias_for(&host)
        .or_else(|| alias_for(&base))
        .map(str::to_string)
        .or_else(|| base.split('.').next().map(str::to_string))
        .unwrap_or_default()
        .to_lowercase();

    if label.is_empty() {
        return None;
    }

    let sanitized: String = label
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let dashless = label.replace('-', "");

    [label, sanitized, dashless]
        .into_iter()
        .map(|candidate| format!("fa-brands fa-{candidate}"))
        .find(|class| icons.has_class(class))
}

fn alias_for(host: &str) -> Option<&'static str> {
    DOMAIN_ALIASES
        .iter()
        .find(|(domain, _)| *domain == host)
        .map(|(_, label)| *label)
}

/// Pages bundled with the app that get fixed titles and glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPage {
    Games,
    Movies,
}

impl AppPage {
    pub fn detect(url: &str) -> Option<Self> {
        if url.contains("games.html") {
            Some(AppPage::Games)
        } else if url.contains("movies.html") {
            Some(AppPage::Movies)
        } else {
            None
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppPage::Games => "Games",
            AppPage::Movies => "Movies",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            AppPage::Games => "fa-solid fa-gamepad",
            AppPage::Movies => "fa-solid fa-film",
        }
    }
}
