use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

use folio_core::attachment;

use crate::auth_layer::AdminIdentity;
use crate::error::ServerError;

use super::AppState;
use super::schemas::ErrorResponse;

/// `GET /document` -- the stored document, exactly as persisted.
///
/// Legacy shapes are returned untouched; the canonical view lives at
/// `/document/normalized`.
#[utoipa::path(
    get,
    path = "/document",
    tag = "Document",
    summary = "Get raw document",
    responses(
        (status = 200, description = "The stored document, `{}` when empty"),
        (status = 503, description = "Document storage unavailable", body = ErrorResponse),
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    let doc = state.documents.get_document().await?;
    Ok(Json(doc))
}

/// `GET /document/normalized` -- the canonical bilingual document.
#[utoipa::path(
    get,
    path = "/document/normalized",
    tag = "Document",
    summary = "Get normalized document",
    description = "The stored document repaired into the canonical bilingual schema. \
                   The stored row itself is never rewritten by a read.",
    responses(
        (status = 200, description = "The canonical document"),
        (status = 503, description = "Document storage unavailable", body = ErrorResponse),
    )
)]
pub async fn get_normalized(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    let doc = state.documents.normalized_document().await?;
    Ok(Json(doc))
}

/// `PUT /document` -- replace the whole document.
#[utoipa::path(
    put,
    path = "/document",
    tag = "Document",
    summary = "Replace document",
    description = "Overwrites the stored document wholesale. The editor client is the \
                   schema guardian for bulk saves; no per-field validation happens here.",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "Document saved"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Concurrent modification", body = ErrorResponse),
    )
)]
pub async fn replace_document(
    State(state): State<AppState>,
    axum::Extension(identity): axum::Extension<AdminIdentity>,
    Json(doc): Json<Value>,
) -> Result<impl IntoResponse, ServerError> {
    state.documents.replace_document(doc).await?;
    info!(user = %identity.user_id, "document replaced");
    Ok(Json(serde_json::json!({ "status": "saved" })))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SectionRequest {
    /// Section name, e.g. `"about"` or `"projects"`.
    #[schema(example = "about")]
    pub section: String,
    /// The payload: full section value for PUT, partial object for PATCH.
    #[schema(value_type = Object)]
    pub data: Value,
}

/// `PUT /document/sections` -- replace one section.
#[utoipa::path(
    put,
    path = "/document/sections",
    tag = "Document",
    summary = "Replace section",
    security(("session_token" = [])),
    request_body = SectionRequest,
    responses(
        (status = 200, description = "Section replaced"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse),
    )
)]
pub async fn replace_section(
    State(state): State<AppState>,
    Json(body): Json<SectionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    state
        .documents
        .replace_section(&body.section, body.data)
        .await?;
    Ok(Json(serde_json::json!({ "status": "saved" })))
}

/// `PATCH /document/sections` -- shallow-merge into an object section.
#[utoipa::path(
    patch,
    path = "/document/sections",
    tag = "Document",
    summary = "Patch section",
    description = "Shallow-merges the partial object into the section. Array sections \
                   are rejected: merging an object into a list has no meaning.",
    security(("session_token" = [])),
    request_body = SectionRequest,
    responses(
        (status = 200, description = "Section patched"),
        (status = 400, description = "Array section or non-object payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse),
    )
)]
pub async fn patch_section(
    State(state): State<AppState>,
    Json(body): Json<SectionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    state
        .documents
        .patch_section(&body.section, body.data)
        .await?;
    Ok(Json(serde_json::json!({ "status": "saved" })))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PushItemRequest {
    #[schema(example = "projects")]
    pub section: String,
    /// The item to append. Assigned an `id` when it lacks one.
    #[schema(value_type = Object)]
    pub item: Value,
}

/// `POST /document/sections` -- append an item to an array section.
#[utoipa::path(
    post,
    path = "/document/sections",
    tag = "Document",
    summary = "Append item",
    security(("session_token" = [])),
    request_body = PushItemRequest,
    responses(
        (status = 200, description = "Item appended; body holds it as stored"),
        (status = 400, description = "Item is not an object", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse),
    )
)]
pub async fn push_item(
    State(state): State<AppState>,
    Json(body): Json<PushItemRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let stored = state.documents.push_item(&body.section, body.item).await?;
    Ok(Json(serde_json::json!({ "status": "saved", "item": stored })))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertItemsRequest {
    #[schema(example = "projects")]
    pub section: String,
    /// A single item to upsert.
    #[schema(value_type = Object)]
    pub item: Option<Value>,
    /// Several items to upsert in order.
    #[schema(value_type = Vec<Object>)]
    pub items: Option<Vec<Value>>,
}

/// `PUT /document/sections/items` -- upsert one or many items by id.
#[utoipa::path(
    put,
    path = "/document/sections/items",
    tag = "Document",
    summary = "Upsert items",
    description = "Replaces the element with a matching id or appends when no match \
                   exists. Accepts `item` or `items`.",
    security(("session_token" = [])),
    request_body = UpsertItemsRequest,
    responses(
        (status = 200, description = "Items upserted; body holds them as stored"),
        (status = 400, description = "No item given, or an item is not an object", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse),
    )
)]
pub async fn upsert_items(
    State(state): State<AppState>,
    Json(body): Json<UpsertItemsRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let items = match (body.item, body.items) {
        (Some(item), None) => vec![item],
        (None, Some(items)) if !items.is_empty() => items,
        _ => {
            return Err(ServerError::BadRequest(
                "provide exactly one of `item` or a non-empty `items`".to_owned(),
            ));
        }
    };

    let stored = state.documents.upsert_items(&body.section, items).await?;
    Ok(Json(serde_json::json!({ "status": "saved", "items": stored })))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteItemRequest {
    #[schema(example = "certifications")]
    pub section: String,
    /// Item id (array sections) or key (object sections).
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemResponse {
    /// Whether anything was removed. A miss is still a success.
    pub deleted: bool,
    /// Number of orphaned blobs removed by the cleanup cascade.
    pub removed_blobs: u64,
}

/// `DELETE /document` -- remove an item and clean up its blobs.
#[utoipa::path(
    delete,
    path = "/document",
    tag = "Document",
    summary = "Delete item",
    description = "Removes the item with the given id and best-effort deletes any \
                   storage blobs it referenced. A missing id is an idempotent no-op.",
    security(("session_token" = [])),
    request_body = DeleteItemRequest,
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteItemResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse),
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Json(body): Json<DeleteItemRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let removed = state.documents.delete_item(&body.section, &body.id).await?;

    // The document is the source of truth; blob cleanup is best-effort and
    // never blocks the metadata deletion.
    let mut removed_blobs = 0;
    if let Some(ref item) = removed {
        let keys = attachment::storage_keys(item);
        if !keys.is_empty() {
            removed_blobs = state.blobs.remove(&keys).await;
            if removed_blobs < keys.len() as u64 {
                warn!(
                    section = %body.section,
                    id = %body.id,
                    requested = keys.len(),
                    removed = removed_blobs,
                    "some blobs could not be removed; leaking is recoverable"
                );
            }
        }
        info!(section = %body.section, id = %body.id, "item deleted");
    }

    Ok(Json(DeleteItemResponse {
        deleted: removed.is_some(),
        removed_blobs,
    }))
}
