use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use folio_core::{Document, MergeError, SectionKind, merge, normalize};

use crate::error::DocumentError;
use crate::store::DocumentStore;

/// Applies the document operations as serialized read-modify-write cycles.
///
/// A single-admin tool does not need cross-process coordination, but two
/// concurrent section writes interleaving their read and write phases would
/// silently drop one section. The service therefore holds one write lock
/// across every cycle, and the store's version check catches any writer
/// that bypassed it.
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    write_lock: Mutex<()>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The stored row as-is, or `{}` when nothing has been saved yet.
    ///
    /// Normalization is deliberately not applied here: repairing the row on
    /// every read would mask data corruption. Callers that want the
    /// canonical shape use [`Self::normalized_document`].
    pub async fn get_document(&self) -> Result<Value, DocumentError> {
        Ok(self
            .store
            .load()
            .await?
            .map_or_else(|| Value::Object(Map::new()), |stored| stored.data))
    }

    /// The canonical view of the stored row, used by the public page's read path.
    pub async fn normalized_document(&self) -> Result<Document, DocumentError> {
        let raw = self.get_document().await?;
        Ok(normalize(&raw))
    }

    /// Overwrite the document wholesale. No per-field validation: the
    /// editor client is the schema guardian for bulk saves.
    #[instrument(skip_all)]
    pub async fn replace_document(&self, doc: Value) -> Result<(), DocumentError> {
        self.mutate(|current| {
            *current = doc;
            Ok(())
        })
        .await
    }

    /// Replace one section, leaving every other key untouched.
    #[instrument(skip(self, payload))]
    pub async fn replace_section(&self, section: &str, payload: Value) -> Result<(), DocumentError> {
        let section = known_section(section)?;
        self.mutate(|current| {
            merge::replace_section(current, section.as_str(), payload);
            Ok(())
        })
        .await
    }

    /// Shallow-merge a partial object into an object-shaped section.
    #[instrument(skip(self, partial))]
    pub async fn patch_section(&self, section: &str, partial: Value) -> Result<(), DocumentError> {
        let section = known_section(section)?;
        self.mutate(|current| {
            merge::patch_section(current, section.as_str(), partial)?;
            Ok(())
        })
        .await
    }

    /// Append an item to an array section. Returns the item as stored.
    #[instrument(skip(self, item))]
    pub async fn push_item(&self, section: &str, item: Value) -> Result<Value, DocumentError> {
        let section = known_array_section(section)?;
        self.mutate(|current| Ok(merge::push_item(current, section.as_str(), item)?))
            .await
    }

    /// Upsert items into an array section by id. Returns them as stored.
    #[instrument(skip(self, items))]
    pub async fn upsert_items(
        &self,
        section: &str,
        items: Vec<Value>,
    ) -> Result<Vec<Value>, DocumentError> {
        let section = known_array_section(section)?;
        self.mutate(|current| Ok(merge::upsert_items(current, section.as_str(), items)?))
            .await
    }

    /// Remove an item (or object key) by id. Returns the removed value;
    /// a miss is an idempotent no-op and writes nothing.
    #[instrument(skip(self))]
    pub async fn delete_item(
        &self,
        section: &str,
        id: &str,
    ) -> Result<Option<Value>, DocumentError> {
        let section = known_section(section)?;

        let _guard = self.write_lock.lock().await;
        let stored = self.store.load().await?;
        let version = stored.as_ref().map(|s| s.version);
        let mut data = stored.map_or_else(|| Value::Object(Map::new()), |s| s.data);

        let removed = merge::delete_item(&mut data, section.as_str(), id);
        if removed.is_none() {
            debug!(%section, id, "delete matched nothing");
            return Ok(None);
        }

        self.store.save(&data, version).await?;
        Ok(removed)
    }

    /// One serialized read-modify-write cycle.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Value) -> Result<T, DocumentError>,
    ) -> Result<T, DocumentError> {
        let _guard = self.write_lock.lock().await;
        let stored = self.store.load().await?;
        let version = stored.as_ref().map(|s| s.version);
        let mut data = stored.map_or_else(|| Value::Object(Map::new()), |s| s.data);

        let result = op(&mut data)?;
        self.store.save(&data, version).await?;
        Ok(result)
    }
}

fn known_section(name: &str) -> Result<SectionKind, DocumentError> {
    SectionKind::parse(name).ok_or_else(|| DocumentError::UnknownSection(name.to_owned()))
}

/// Item operations only make sense on sections whose canonical value is an
/// array; appending to `about` would clobber it with a list.
fn known_array_section(name: &str) -> Result<SectionKind, DocumentError> {
    let section = known_section(name)?;
    if !section.is_array() {
        return Err(MergeError::InvalidOperation(format!(
            "section `{name}` does not hold items"
        ))
        .into());
    }
    Ok(section)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::memory::MemoryDocumentStore;

    use super::*;

    fn service() -> DocumentService {
        DocumentService::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn empty_store_reads_as_empty_object() {
        let service = service();
        assert_eq!(service.get_document().await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn replace_document_overwrites_wholesale() {
        let service = service();
        service
            .replace_document(json!({"hero": {"name": "Aoi"}, "stray": 1}))
            .await
            .unwrap();
        service
            .replace_document(json!({"about": {"status": "Looking"}}))
            .await
            .unwrap();

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc, json!({"about": {"status": "Looking"}}));
    }

    #[tokio::test]
    async fn replace_section_preserves_other_sections() {
        let service = service();
        service
            .replace_document(json!({"about": {"status": "old"}, "contact": {"email": "a@b.c"}}))
            .await
            .unwrap();

        service
            .replace_section("education", json!([{"id": "e1"}]))
            .await
            .unwrap();

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc["education"], json!([{"id": "e1"}]));
        assert_eq!(doc["about"], json!({"status": "old"}));
        assert_eq!(doc["contact"], json!({"email": "a@b.c"}));
    }

    #[tokio::test]
    async fn unknown_sections_are_rejected() {
        let service = service();
        let err = service
            .replace_section("blog", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownSection(_)));

        let err = service.delete_item("blog", "x").await.unwrap_err();
        assert!(matches!(err, DocumentError::UnknownSection(_)));
    }

    #[tokio::test]
    async fn patch_merges_object_sections_only() {
        let service = service();
        service
            .replace_document(json!({
                "about": {"body": "hi", "status": "old"},
                "projects": [{"id": "p1"}],
            }))
            .await
            .unwrap();

        service
            .patch_section("about", json!({"status": "Looking"}))
            .await
            .unwrap();
        let doc = service.get_document().await.unwrap();
        assert_eq!(doc["about"], json!({"body": "hi", "status": "Looking"}));

        let err = service
            .patch_section("projects", json!({"status": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_item() {
        let service = service();
        service
            .upsert_items("projects", vec![json!({"id": "p1", "title": "draft"})])
            .await
            .unwrap();
        service
            .upsert_items("projects", vec![json!({"id": "p1", "title": "X"})])
            .await
            .unwrap();

        let doc = service.get_document().await.unwrap();
        let projects = doc["projects"].as_array().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0]["title"], json!("X"));
    }

    #[tokio::test]
    async fn push_assigns_ids() {
        let service = service();
        let stored = service
            .push_item("papers", json!({"title": "On Folios"}))
            .await
            .unwrap();
        assert!(stored["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn item_operations_reject_non_array_sections() {
        let service = service();
        let err = service
            .push_item("about", json!({"id": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidOperation(_)));

        let err = service
            .upsert_items("skills", vec![json!({"id": "x"})])
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn delete_missing_writes_nothing() {
        let service = service();
        service
            .replace_section("certifications", json!([{"id": "c1"}]))
            .await
            .unwrap();

        let removed = service
            .delete_item("certifications", "missing-id")
            .await
            .unwrap();
        assert!(removed.is_none());

        // The row version is untouched by the no-op.
        let store = MemoryDocumentStore::new();
        store.save(&json!({}), None).await.unwrap();
        let service = DocumentService::new(Arc::new(store));
        service.delete_item("certifications", "x").await.unwrap();
        let doc = service.get_document().await.unwrap();
        assert_eq!(doc, json!({}));
    }

    #[tokio::test]
    async fn delete_returns_removed_item_for_cleanup() {
        let service = service();
        service
            .replace_section(
                "certifications",
                json!([{"id": "c1", "pdfKey": "certs/c1.pdf"}]),
            )
            .await
            .unwrap();

        let removed = service.delete_item("certifications", "c1").await.unwrap();
        assert_eq!(removed.unwrap()["pdfKey"], json!("certs/c1.pdf"));

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc["certifications"], json!([]));
    }

    #[tokio::test]
    async fn normalized_view_repairs_without_writing_back() {
        let service = service();
        service
            .replace_document(json!({"hero": {"name": "Aoi"}, "projects": "legacy"}))
            .await
            .unwrap();

        let doc = service.normalized_document().await.unwrap();
        assert_eq!(doc.hero.name.english, "Aoi");
        assert_eq!(doc.hero.name.japanese, "Aoi");
        assert!(doc.projects.is_empty());

        // The stored row keeps its legacy shape.
        let raw = service.get_document().await.unwrap();
        assert_eq!(raw["projects"], json!("legacy"));
        assert_eq!(raw["hero"], json!({"name": "Aoi"}));
    }

    #[tokio::test]
    async fn interleaved_section_writes_both_land() {
        let service = Arc::new(service());

        let a = Arc::clone(&service);
        let b = Arc::clone(&service);
        let (ra, rb) = tokio::join!(
            a.replace_section("about", json!({"status": "Looking"})),
            b.replace_section("contact", json!({"email": "a@b.c"})),
        );
        ra.unwrap();
        rb.unwrap();

        let doc = service.get_document().await.unwrap();
        assert_eq!(doc["about"], json!({"status": "Looking"}));
        assert_eq!(doc["contact"], json!({"email": "a@b.c"}));
    }
}
