//! Pure merge operations over the stored JSON document.
//!
//! These functions implement the partial-update semantics of the document
//! API: whole-section replace, object-only shallow patch, and id-keyed item
//! append/upsert/delete. They operate on raw `serde_json::Value` documents
//! so un-normalized legacy rows can be edited without first being rewritten.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::normalize::fresh_id;

/// A caller mistake in a merge operation: a 400-class contract violation,
/// never a transient failure.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Replace one section wholesale, leaving every other key untouched.
pub fn replace_section(doc: &mut Value, section: &str, payload: Value) {
    ensure_object(doc).insert(section.to_owned(), payload);
}

/// Shallow-merge `partial` into an object-shaped section.
///
/// Array sections reject the patch: merging an object into a list has no
/// meaning and a silent replace would destroy items. A missing or
/// non-object current value is treated as an empty object.
pub fn patch_section(doc: &mut Value, section: &str, partial: Value) -> Result<(), MergeError> {
    let Value::Object(partial) = partial else {
        return Err(MergeError::InvalidOperation(format!(
            "patch payload for `{section}` must be an object"
        )));
    };

    let root = ensure_object(doc);
    if matches!(root.get(section), Some(Value::Array(_))) {
        return Err(MergeError::InvalidOperation(format!(
            "section `{section}` is an array and cannot be patched"
        )));
    }

    let current = root
        .entry(section.to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(target) = current {
        for (key, value) in partial {
            target.insert(key, value);
        }
    }
    Ok(())
}

/// Append an item to an array section, assigning an `id` if missing.
///
/// Returns the item as stored (with its id). A missing or non-array current
/// value is coerced to an empty array first.
pub fn push_item(doc: &mut Value, section: &str, item: Value) -> Result<Value, MergeError> {
    let item = with_id(item, section)?;
    section_array(doc, section).push(item.clone());
    Ok(item)
}

/// Upsert items into an array section, keyed by `id`.
///
/// Each item replaces the element with a matching id, or is appended when
/// no match exists. Items without an id are assigned one (and therefore
/// always append). Returns the items as stored.
pub fn upsert_items(
    doc: &mut Value,
    section: &str,
    items: Vec<Value>,
) -> Result<Vec<Value>, MergeError> {
    let mut stored = Vec::with_capacity(items.len());
    for item in items {
        let item = with_id(item, section)?;
        let id = item_id(&item);
        let array = section_array(doc, section);
        match array.iter_mut().find(|existing| item_id(existing) == id) {
            Some(existing) => *existing = item.clone(),
            None => array.push(item.clone()),
        }
        stored.push(item);
    }
    Ok(stored)
}

/// Remove the item with the given id from a section.
///
/// Array sections filter by the `id` member; object sections used as keyed
/// maps remove the `id` key. Returns the removed value, or `None` when
/// nothing matched; deletion is idempotent and a miss is not an error.
pub fn delete_item(doc: &mut Value, section: &str, id: &str) -> Option<Value> {
    match ensure_object(doc).get_mut(section)? {
        Value::Array(items) => {
            let index = items.iter().position(|item| item_id(item) == id)?;
            Some(items.remove(index))
        }
        Value::Object(map) => map.remove(id),
        _ => None,
    }
}

/// View the document root as an object, resetting it if it holds anything
/// else. Legacy rows have been observed holding null here.
fn ensure_object(doc: &mut Value) -> &mut Map<String, Value> {
    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    doc.as_object_mut().expect("document root was just made an object")
}

fn section_array<'a>(doc: &'a mut Value, section: &str) -> &'a mut Vec<Value> {
    let current = ensure_object(doc)
        .entry(section.to_owned())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !current.is_array() {
        *current = Value::Array(Vec::new());
    }
    current.as_array_mut().expect("section was just made an array")
}

/// Require an object item and make sure it carries a non-empty string id.
fn with_id(item: Value, section: &str) -> Result<Value, MergeError> {
    let Value::Object(mut map) = item else {
        return Err(MergeError::InvalidOperation(format!(
            "items in `{section}` must be objects"
        )));
    };
    let has_id = matches!(map.get("id"), Some(Value::String(id)) if !id.is_empty());
    if !has_id {
        map.insert("id".to_owned(), Value::String(fresh_id()));
    }
    Ok(Value::Object(map))
}

fn item_id(item: &Value) -> &str {
    item.get("id").and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn replace_section_touches_only_its_key() {
        let mut doc = json!({"about": {"status": "old"}, "education": [1, 2]});
        replace_section(&mut doc, "education", json!([{"id": "e1"}]));
        assert_eq!(doc["education"], json!([{"id": "e1"}]));
        assert_eq!(doc["about"], json!({"status": "old"}));
    }

    #[test]
    fn replace_section_repairs_non_object_root() {
        let mut doc = json!(null);
        replace_section(&mut doc, "hero", json!({"name": "Aoi"}));
        assert_eq!(doc, json!({"hero": {"name": "Aoi"}}));
    }

    #[test]
    fn patch_merges_without_clearing_siblings() {
        let mut doc = json!({"about": {"body": "hello", "status": "old"}});
        patch_section(&mut doc, "about", json!({"status": "Looking"})).unwrap();
        assert_eq!(
            doc["about"],
            json!({"body": "hello", "status": "Looking"})
        );
    }

    #[test]
    fn patch_rejects_array_sections() {
        let mut doc = json!({"projects": [{"id": "p1"}]});
        let err = patch_section(&mut doc, "projects", json!({"x": 1})).unwrap_err();
        assert!(matches!(err, MergeError::InvalidOperation(_)));
        // The document is untouched on failure.
        assert_eq!(doc["projects"], json!([{"id": "p1"}]));
    }

    #[test]
    fn patch_rejects_non_object_payload() {
        let mut doc = json!({});
        let err = patch_section(&mut doc, "about", json!("status")).unwrap_err();
        assert!(matches!(err, MergeError::InvalidOperation(_)));
    }

    #[test]
    fn patch_creates_missing_section() {
        let mut doc = json!({});
        patch_section(&mut doc, "about", json!({"status": "Looking"})).unwrap();
        assert_eq!(doc["about"], json!({"status": "Looking"}));
    }

    #[test]
    fn push_assigns_id_and_appends() {
        let mut doc = json!({});
        let stored = push_item(&mut doc, "projects", json!({"title": "folio"})).unwrap();
        let id = stored["id"].as_str().unwrap();
        assert!(!id.is_empty());
        assert_eq!(doc["projects"][0]["id"], json!(id));

        push_item(&mut doc, "projects", json!({"id": "p2"})).unwrap();
        assert_eq!(doc["projects"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn push_rejects_non_object_items() {
        let mut doc = json!({});
        assert!(push_item(&mut doc, "projects", json!("nope")).is_err());
    }

    #[test]
    fn upsert_replaces_matching_id_without_duplicating() {
        let mut doc = json!({"projects": [{"id": "p1", "title": "old"}]});
        upsert_items(&mut doc, "projects", vec![json!({"id": "p1", "title": "X"})]).unwrap();

        let projects = doc["projects"].as_array().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0], json!({"id": "p1", "title": "X"}));
    }

    #[test]
    fn upsert_appends_when_no_match() {
        let mut doc = json!({"projects": [{"id": "p1"}]});
        upsert_items(&mut doc, "projects", vec![json!({"id": "p2"})]).unwrap();
        assert_eq!(doc["projects"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn upsert_coerces_non_array_section() {
        let mut doc = json!({"projects": "legacy"});
        upsert_items(&mut doc, "projects", vec![json!({"id": "p1"})]).unwrap();
        assert_eq!(doc["projects"], json!([{"id": "p1"}]));
    }

    #[test]
    fn delete_filters_array_items_by_id() {
        let mut doc = json!({"certifications": [{"id": "c1"}, {"id": "c2"}]});
        let removed = delete_item(&mut doc, "certifications", "c1").unwrap();
        assert_eq!(removed["id"], json!("c1"));
        assert_eq!(doc["certifications"], json!([{"id": "c2"}]));
    }

    #[test]
    fn delete_removes_object_map_keys() {
        let mut doc = json!({"contact": {"email": "a@b.c"}});
        let removed = delete_item(&mut doc, "contact", "email").unwrap();
        assert_eq!(removed, json!("a@b.c"));
        assert_eq!(doc["contact"], json!({}));
    }

    #[test]
    fn delete_missing_id_is_a_noop() {
        let mut doc = json!({"certifications": [{"id": "c1"}]});
        let before = doc.clone();
        assert!(delete_item(&mut doc, "certifications", "missing-id").is_none());
        assert_eq!(doc, before);

        assert!(delete_item(&mut doc, "no-such-section", "c1").is_none());
        assert_eq!(doc["certifications"], before["certifications"]);
    }
}
