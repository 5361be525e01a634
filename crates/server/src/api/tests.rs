use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};

use folio_auth::password::hash_password;
use folio_auth::testing::CaptureMailer;
use folio_auth::{AdminCredentials, AuthConfig, Authenticator, OtpMailer};
use folio_blob::MemoryBlobStore;
use folio_document::{DocumentService, MemoryDocumentStore};
use folio_state_memory::MemoryStateStore;

use super::{AppState, router};

const PASSWORD: &str = "correct horse battery staple";

struct Harness {
    server: TestServer,
    mailer: Arc<CaptureMailer>,
    blobs: Arc<MemoryBlobStore>,
}

fn harness() -> Harness {
    let mailer = Arc::new(CaptureMailer::default());
    let auth = Arc::new(Authenticator::new(
        AdminCredentials::new("admin", hash_password(PASSWORD).unwrap(), "admin@example.com"),
        AuthConfig::default(),
        Arc::new(MemoryStateStore::new()),
        Arc::clone(&mailer) as Arc<dyn OtpMailer>,
    ));
    let documents = Arc::new(DocumentService::new(Arc::new(MemoryDocumentStore::new())));
    let blobs = Arc::new(MemoryBlobStore::new("http://localhost:8080"));

    let state = AppState {
        auth,
        documents,
        blobs: Arc::clone(&blobs) as Arc<dyn folio_blob::BlobStore>,
    };
    Harness {
        server: TestServer::new(router(state)).unwrap(),
        mailer,
        blobs,
    }
}

/// Full login flow: credentials -> emailed code -> session token.
async fn establish_session(harness: &Harness) -> String {
    let response = harness
        .server
        .post("/auth/login")
        .json(&json!({"userId": "admin", "password": PASSWORD}))
        .await;
    response.assert_status_ok();
    let session_id = response.json::<Value>()["sessionId"]
        .as_str()
        .unwrap()
        .to_owned();
    let code = harness.mailer.last_code().unwrap();

    let response = harness
        .server
        .post("/auth/verify-otp")
        .json(&json!({"sessionId": session_id, "otp": code}))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["sessionToken"]
        .as_str()
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn health_is_public() {
    let harness = harness();
    let response = harness.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], json!("ok"));
}

#[tokio::test]
async fn login_with_wrong_credentials_is_generic_401() {
    let harness = harness();
    let response = harness
        .server
        .post("/auth/login")
        .json(&json!({"userId": "admin", "password": "wrong"}))
        .await;
    response.assert_status_unauthorized();

    let error = response.json::<Value>()["error"].as_str().unwrap().to_owned();
    assert_eq!(error, "invalid credentials");
}

#[tokio::test]
async fn otp_mismatch_is_retryable_end_to_end() {
    let harness = harness();

    let response = harness
        .server
        .post("/auth/login")
        .json(&json!({"userId": "admin", "password": PASSWORD}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    let session_id = body["sessionId"].as_str().unwrap().to_owned();
    assert_eq!(body["expiresIn"], json!(300));

    let code = harness.mailer.last_code().unwrap();
    let wrong = if code == "000000" { "999999" } else { "000000" };

    // Deliberately wrong code: rejected, but the challenge survives.
    let response = harness
        .server
        .post("/auth/verify-otp")
        .json(&json!({"sessionId": session_id, "otp": wrong}))
        .await;
    response.assert_status_unauthorized();

    // The correct code still works.
    let response = harness
        .server
        .post("/auth/verify-otp")
        .json(&json!({"sessionId": session_id, "otp": code}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["expiresIn"], json!(1800));
}

#[tokio::test]
async fn validate_and_logout_round_trip() {
    let harness = harness();
    let token = establish_session(&harness).await;

    let response = harness
        .server
        .post("/auth/validate-session")
        .json(&json!({"sessionToken": token}))
        .await;
    response.assert_status_ok();
    let remaining = response.json::<Value>()["remainingTime"].as_u64().unwrap();
    assert!(remaining > 0 && remaining <= 1800);

    let response = harness
        .server
        .post("/auth/logout")
        .json(&json!({"sessionToken": token}))
        .await;
    response.assert_status_ok();

    // The session is gone; logout again is still 200.
    let response = harness
        .server
        .post("/auth/validate-session")
        .json(&json!({"sessionToken": token}))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post("/auth/logout")
        .json(&json!({"sessionToken": token}))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn document_reads_are_public_but_writes_need_a_token() {
    let harness = harness();

    let response = harness.server.get("/document").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({}));

    let response = harness
        .server
        .put("/document/sections")
        .json(&json!({"section": "about", "data": {"status": "Looking"}}))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .put("/document/sections")
        .authorization_bearer("not-a-real-token")
        .json(&json!({"section": "about", "data": {"status": "Looking"}}))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn section_replace_and_patch_semantics() {
    let harness = harness();
    let token = establish_session(&harness).await;

    let response = harness
        .server
        .put("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({"section": "about", "data": {"body": "hi", "status": "old"}}))
        .await;
    response.assert_status_ok();

    // PATCH merges without clearing the other members.
    let response = harness
        .server
        .patch("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({"section": "about", "data": {"status": "Looking"}}))
        .await;
    response.assert_status_ok();

    let doc = harness.server.get("/document").await.json::<Value>();
    assert_eq!(doc["about"], json!({"body": "hi", "status": "Looking"}));

    // The same call against an array section is a 400.
    let response = harness
        .server
        .put("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({"section": "projects", "data": [{"id": "p1"}]}))
        .await;
    response.assert_status_ok();

    let response = harness
        .server
        .patch("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({"section": "projects", "data": {"status": "x"}}))
        .await;
    response.assert_status_bad_request();

    // Unknown sections are a 404.
    let response = harness
        .server
        .put("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({"section": "blog", "data": {}}))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn upsert_keeps_one_item_per_id() {
    let harness = harness();
    let token = establish_session(&harness).await;

    for title in ["draft", "final"] {
        let response = harness
            .server
            .put("/document/sections/items")
            .authorization_bearer(&token)
            .json(&json!({"section": "projects", "item": {"id": "p1", "title": title}}))
            .await;
        response.assert_status_ok();
    }

    let doc = harness.server.get("/document").await.json::<Value>();
    let projects = doc["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["title"], json!("final"));
}

#[tokio::test]
async fn upsert_requires_item_or_items() {
    let harness = harness();
    let token = establish_session(&harness).await;

    let response = harness
        .server
        .put("/document/sections/items")
        .authorization_bearer(&token)
        .json(&json!({"section": "projects"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn push_assigns_an_id() {
    let harness = harness();
    let token = establish_session(&harness).await;

    let response = harness
        .server
        .post("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({"section": "papers", "item": {"title": "On Folios"}}))
        .await;
    response.assert_status_ok();
    let item = response.json::<Value>()["item"].clone();
    assert!(item["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn delete_cascades_to_blob_cleanup() {
    let harness = harness();
    let token = establish_session(&harness).await;

    // Upload a file and reference it from a certification item.
    let response = harness
        .server
        .post("/files")
        .add_query_param("key", "certs/c1.pdf")
        .authorization_bearer(&token)
        .content_type("application/pdf")
        .bytes("pdf-bytes".into())
        .await;
    response.assert_status_ok();
    let url = response.json::<Value>()["url"].as_str().unwrap().to_owned();
    assert_eq!(harness.blobs.len(), 1);

    let response = harness
        .server
        .post("/document/sections")
        .authorization_bearer(&token)
        .json(&json!({
            "section": "certifications",
            "item": {"id": "c1", "name": "AWS SAA", "pdf": url, "pdfKey": "certs/c1.pdf"},
        }))
        .await;
    response.assert_status_ok();

    // Deleting the item removes the blob too.
    let response = harness
        .server
        .delete("/document")
        .authorization_bearer(&token)
        .json(&json!({"section": "certifications", "id": "c1"}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["deleted"], json!(true));
    assert_eq!(body["removedBlobs"], json!(1));
    assert!(harness.blobs.is_empty());

    let doc = harness.server.get("/document").await.json::<Value>();
    assert_eq!(doc["certifications"], json!([]));

    // Deleting again is an idempotent no-op.
    let response = harness
        .server
        .delete("/document")
        .authorization_bearer(&token)
        .json(&json!({"section": "certifications", "id": "c1"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["deleted"], json!(false));
}

#[tokio::test]
async fn uploaded_files_are_publicly_readable() {
    let harness = harness();
    let token = establish_session(&harness).await;

    harness
        .server
        .post("/files")
        .add_query_param("key", "projects/shot.png")
        .authorization_bearer(&token)
        .content_type("image/png")
        .bytes("png-bytes".into())
        .await
        .assert_status_ok();

    let response = harness.server.get("/files/projects/shot.png").await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"png-bytes".as_slice());

    let response = harness.server.get("/files/missing.png").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn normalized_view_repairs_legacy_shapes() {
    let harness = harness();
    let token = establish_session(&harness).await;

    harness
        .server
        .put("/document")
        .authorization_bearer(&token)
        .json(&json!({"hero": {"name": "Aoi"}, "projects": "legacy"}))
        .await
        .assert_status_ok();

    let doc = harness.server.get("/document/normalized").await.json::<Value>();
    assert_eq!(
        doc["hero"]["name"],
        json!({"english": "Aoi", "japanese": "Aoi"})
    );
    assert_eq!(doc["projects"], json!([]));

    // The raw row is untouched.
    let raw = harness.server.get("/document").await.json::<Value>();
    assert_eq!(raw["projects"], json!("legacy"));
}
