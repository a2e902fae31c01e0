//! URL codecs for the path segment after the proxy prefix

use percent_encoding::percent_decode_str;

use evadion_navigation::encode_component;

pub trait UrlCodec: Send + Sync {
    fn encode(&self, url: &str) -> String;

    /// Reverse [`UrlCodec::encode`]. `None` when the input cannot be decoded.
    fn decode(&self, encoded: &str) -> Option<String>;
}

/// Component percent-encoding only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl UrlCodec for PlainCodec {
    fn encode(&self, url: &str) -> String {
        encode_component(url)
    }

    /// Undecodable input is returned unchanged.
    fn decode(&self, encoded: &str) -> Option<String> {
        Some(
            percent_decode_str(encoded)
                .decode_utf8()
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| encoded.to_string()),
        )
    }
}

/// Flips bit 1 of every odd-indexed character, then percent-encodes.
///
/// The query string is left out of the XOR step on decode, so addresses the
/// page appended a query to still resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct XorCodec;

impl XorCodec {
    fn scramble(input: &str) -> String {
        input
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if i % 2 == 1 {
                    char::from_u32(c as u32 ^ 2).unwrap_or(c)
                } else {
                    c
                }
            })
            .collect()
    }
}

impl UrlCodec for XorCodec {
    fn encode(&self, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }
        encode_component(&Self::scramble(url))
    }

    fn decode(&self, encoded: &str) -> Option<String> {
        if encoded.is_empty() {
            return Some(String::new());
        }

        let (input, search) = match encoded.split_once('?') {
            Some((input, search)) => (input, Some(search)),
            None => (encoded, None),
        };

        let decoded = percent_decode_str(input).decode_utf8().ok()?;
        let mut url = Self::scramble(&decoded);
        if let Some(search) = search {
            url.push('?');
            url.push_str(search);
        }
        Some(url)
    }
}
