//! Base-URL replacement inside JSON content.
//!
//! Page-builder content stores absolute asset and link URLs, so moving data
//! between the local and production sites has to swap the base URL. The
//! rewrite works on the JSON text itself: only string values containing the
//! URL are re-encoded, and everything else (keys, key order, numbers,
//! whitespace, escapes) is copied through byte for byte.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Replace every occurrence of `from` with `to` in JSON string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRewrite {
    pub from: String,
    pub to: String,
}

impl UrlRewrite {
    /// Build a rewrite, trimming trailing slashes from both URLs so that
    /// `https://a.example/` and `https://a.example` behave the same.
    pub fn new(from: impl AsRef<str>, to: impl AsRef<str>) -> Self {
        Self {
            from: from.as_ref().trim_end_matches('/').to_string(),
            to: to.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// A rewrite with an empty source or identical ends changes nothing.
    pub fn is_noop(&self) -> bool {
        self.from.is_empty() || self.from == self.to
    }

    /// Rewrite text that holds a serialized JSON object or array.
    ///
    /// Returns `None` when the text is not JSON-shaped or nothing matched,
    /// so callers keep the original bytes untouched.
    pub fn rewrite_json_text(&self, text: &str) -> Option<(String, usize)> {
        let trimmed = text.trim_start();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            return None;
        }
        self.rewrite_json_document(text)
    }

    /// Rewrite any JSON document, scalars included.
    ///
    /// Returns `None` for invalid JSON or when no string value matched.
    pub fn rewrite_json_document(&self, text: &str) -> Option<(String, usize)> {
        if self.is_noop() || !self.may_occur_in(text) {
            return None;
        }
        serde_json::from_str::<IgnoredAny>(text).ok()?;

        // Valid JSON has no `"` outside string tokens, so every quote found
        // here opens a key or a string value.
        let mut out = String::with_capacity(text.len());
        let mut count = 0;
        let mut rest = text;
        while let Some(start) = rest.find('"') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let len = string_token_len(tail)?;
            let (token, after) = tail.split_at(len);
            let is_key = after.trim_start().starts_with(':');

            match (!is_key).then(|| self.rewrite_string_token(token)).flatten() {
                Some((rewritten, n)) => {
                    out.push_str(&rewritten);
                    count += n;
                }
                None => out.push_str(token),
            }
            rest = after;
        }
        out.push_str(rest);

        (count > 0).then_some((out, count))
    }

    /// Cheap pre-check, also matching the `\/` escaping PHP's `json_encode`
    /// applies by default.
    fn may_occur_in(&self, text: &str) -> bool {
        text.contains(self.from.as_str()) || text.contains(&self.from.replace('/', "\\/"))
    }

    /// Decode one string token, replace, and re-encode it. Keeps `\/`
    /// escaping when the original token used it.
    fn rewrite_string_token(&self, token: &str) -> Option<(String, usize)> {
        let decoded: String = serde_json::from_str(token).ok()?;
        let count = decoded.matches(self.from.as_str()).count();
        if count == 0 {
            return None;
        }
        let mut encoded =
            serde_json::to_string(&decoded.replace(self.from.as_str(), &self.to)).ok()?;
        if token.contains("\\/") {
            encoded = encoded.replace('/', "\\/");
        }
        Some((encoded, count))
    }
}

/// Byte length of the string token at the start of `text`, both quotes
/// included.
fn string_token_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
