use crate::error::StateError;
use crate::key::{KeyKind, StateKey};
use crate::store::StateStore;

/// Run the state store conformance test suite.
///
/// Call this from a backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(store: &dyn StateStore) -> Result<(), StateError> {
    test_get_missing(store).await?;
    test_set_and_get(store).await?;
    test_overwrite(store).await?;
    test_delete(store).await?;
    test_scan_kind(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn StateStore) -> Result<(), StateError> {
    let key = StateKey::new(KeyKind::Session, "missing");
    let val = store.get(&key).await?;
    assert!(val.is_none(), "get on missing key should return None");
    Ok(())
}

async fn test_set_and_get(store: &dyn StateStore) -> Result<(), StateError> {
    let key = StateKey::new(KeyKind::Session, "set-get");
    store.set(&key, "hello", None).await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("hello"));
    Ok(())
}

async fn test_overwrite(store: &dyn StateStore) -> Result<(), StateError> {
    let key = StateKey::new(KeyKind::Otp, "overwrite");
    store.set(&key, "v1", None).await?;
    store.set(&key, "v2", None).await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("v2"), "set should replace the value");
    Ok(())
}

async fn test_delete(store: &dyn StateStore) -> Result<(), StateError> {
    let key = StateKey::new(KeyKind::Session, "to-delete");
    store.set(&key, "bye", None).await?;
    let existed = store.delete(&key).await?;
    assert!(existed, "delete should return true for existing key");
    let val = store.get(&key).await?;
    assert!(val.is_none(), "get after delete should return None");

    let existed = store.delete(&key).await?;
    assert!(!existed, "delete on missing key should return false");
    Ok(())
}

async fn test_scan_kind(store: &dyn StateStore) -> Result<(), StateError> {
    let otp_a = StateKey::new(KeyKind::Otp, "scan-a");
    let otp_b = StateKey::new(KeyKind::Otp, "scan-b");
    let session = StateKey::new(KeyKind::Session, "scan-c");
    store.set(&otp_a, "1", None).await?;
    store.set(&otp_b, "2", None).await?;
    store.set(&session, "3", None).await?;

    let mut entries = store.scan_kind(&KeyKind::Otp).await?;
    entries.retain(|(id, _)| id.starts_with("scan-"));
    entries.sort();
    assert_eq!(
        entries,
        vec![
            ("scan-a".to_owned(), "1".to_owned()),
            ("scan-b".to_owned(), "2".to_owned()),
        ],
        "scan should list only the requested kind"
    );
    Ok(())
}
