//! Host and display helpers

use url::Url;

use crate::input::is_local_resource;

/// Title shown for targets without a parseable host.
pub const NEW_TAB_TITLE: &str = "New Tab";

const SHORT_URL_MAX_CHARS: usize = 28;

/// Host-derived tab title. Unparseable input yields [`NEW_TAB_TITLE`].
pub fn safe_host(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .unwrap_or_default()
            .replacen("www.", "", 1),
        Err(_) => NEW_TAB_TITLE.to_string(),
    }
}

/// Lower-cased hostname without a leading `www.`; empty when unparseable.
pub fn hostname(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .map(|host| strip_www(&host).to_string())
        .unwrap_or_default()
}

/// Registrable-ish domain: the last two labels of the host.
pub fn base_domain(host: &str) -> String {
    let host = host.to_lowercase();
    let host = strip_www(&host);
    let parts: Vec<&str> = host.split('.').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return host.to_string();
    }
    parts[parts.len() - 2..].join(".")
}

/// Compact label for bookmark tiles.
pub fn display_short_url(url: &str) -> String {
    let v = url.trim();
    if is_local_resource(v) {
        return v.to_string();
    }

    let candidate = if v.starts_with("http") {
        v.to_string()
    } else {
        format!("https://{v}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) => strip_www(parsed.host_str().unwrap_or_default()).to_string(),
        Err(_) if v.chars().count() > SHORT_URL_MAX_CHARS => {
            let head: String = v.chars().take(SHORT_URL_MAX_CHARS).collect();
            format!("{head}…")
        }
        Err(_) => v.to_string(),
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
