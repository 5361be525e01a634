//! Storage-key extraction for the blob cleanup cascade.
//!
//! Deleted items may reference uploaded files either through explicit
//! `imageKey`/`pdfKey` members or only through a public URL. The document is
//! the source of truth for item existence; these helpers merely tell the
//! caller which blobs are now orphaned and may be removed best-effort.

use serde_json::Value;

/// Path prefix under which the server exposes uploaded blobs.
pub const PUBLIC_FILES_PREFIX: &str = "/files/";

const KEY_MEMBERS: [&str; 3] = ["imageKey", "pdfKey", "key"];
const URL_MEMBERS: [&str; 4] = ["image", "pdf", "url", "cv"];

/// Collect every storage key referenced by a deleted value.
///
/// Explicit key members win; URL members contribute a key only when one can
/// be parsed out of the path and is not already present.
#[must_use]
pub fn storage_keys(value: &Value) -> Vec<String> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    let mut keys: Vec<String> = Vec::new();
    let mut push = |key: String| {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    };

    for member in KEY_MEMBERS {
        if let Some(key) = map.get(member).and_then(Value::as_str) {
            push(key.to_owned());
        }
    }
    for member in URL_MEMBERS {
        if let Some(key) = map
            .get(member)
            .and_then(Value::as_str)
            .and_then(key_from_public_url)
        {
            push(key);
        }
    }
    keys
}

/// Parse a storage key out of a public file URL.
///
/// Recognizes the `/files/{key}` layout this server produces; anything else
/// (external links, malformed URLs) yields `None`.
#[must_use]
pub fn key_from_public_url(url: &str) -> Option<String> {
    let (_, key) = url.split_once(PUBLIC_FILES_PREFIX)?;
    let key = key.split(['?', '#']).next().unwrap_or_default();
    if key.is_empty() {
        None
    } else {
        Some(key.to_owned())
    }
}
