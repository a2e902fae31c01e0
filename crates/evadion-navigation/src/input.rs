//! Input classification for the address bar
//!
//! 1. Local resource (`/x`, `./x`, `games.html`) → loaded as-is
//! 2. Network address (`https://…`, `example.com`) → navigate, adding `https://` if needed
//! 3. Anything else → search query

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const DEFAULT_HOME_URL: &str = "https://www.google.com";
pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://www.google.com/search?q=%s";

/// Characters `encodeURIComponent` leaves untouched.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const LOCAL_EXTENSIONS: &[&str] = &[".htm", ".html", ".php"];

/// Percent-encode a URL component the way browsers' `encodeURIComponent` does.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// What the user typed, after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Empty,
    Local,
    Address,
    Search,
}

/// True for paths served by the app itself rather than a remote host.
pub fn is_local_resource(input: &str) -> bool {
    let v = input.trim();
    if v.is_empty() {
        return false;
    }

    if v.starts_with('/') || v.starts_with("./") || v.starts_with("../") {
        return true;
    }

    if v.chars().any(char::is_whitespace) {
        return false;
    }

    let lower = v.to_ascii_lowercase();
    LOCAL_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Heuristic check for something that should be loaded rather than searched.
pub fn looks_like_network_address(input: &str) -> bool {
    let v = input.trim();
    if v.is_empty() || v.chars().any(char::is_whitespace) || is_local_resource(v) {
        return false;
    }

    if has_web_scheme(v) {
        return true;
    }

    is_bare_domain(v)
}

/// Normalize input with the default search engine and home page.
pub fn normalize(input: &str) -> String {
    InputClassifier::default().normalize(input)
}

fn has_web_scheme(v: &str) -> bool {
    v.starts_with("http://") || v.starts_with("https://")
}

/// `label.tld` shape: `[a-zA-Z0-9.-]+` then a dot and 2+ letters.
fn is_bare_domain(v: &str) -> bool {
    let Some((head, tld)) = v.rsplit_once('.') else {
        return false;
    };

    !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Clone)]
pub struct InputClassifier {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
    /// Target for empty input
    home_url: String,
}

impl InputClassifier {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
        }
    }

    pub fn with_search_engine(template: String, home_url: String) -> Self {
        Self {
            search_template: template,
            home_url,
        }
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    pub fn classify(&self, input: &str) -> InputKind {
        let v = input.trim();
        if v.is_empty() {
            InputKind::Empty
        } else if is_local_resource(v) {
            InputKind::Local
        } else if looks_like_network_address(v) {
            InputKind::Address
        } else {
            InputKind::Search
        }
    }

    /// Turn arbitrary input into a navigable target. Never fails.
    pub fn normalize(&self, input: &str) -> String {
        let v = input.trim();
        match self.classify(v) {
            InputKind::Empty => self.home_url.clone(),
            InputKind::Local => v.to_string(),
            InputKind::Address if has_web_scheme(v) => v.to_string(),
            InputKind::Address => format!("https://{v}"),
            InputKind::Search => self.build_search_url(v),
        }
    }

    fn build_search_url(&self, query: &str) -> String {
        self.search_template
            .replace("%s", &encode_component(query))
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new()
    }
}
