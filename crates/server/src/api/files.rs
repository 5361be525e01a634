use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::ServerError;

use super::AppState;
use super::schemas::ErrorResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadQuery {
    /// Storage key, e.g. `"projects/screenshot.png"`.
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub key: String,
    /// Public URL the document should reference.
    pub url: String,
    pub size_bytes: u64,
}

/// `POST /files?key=...` -- upload a file (upsert).
#[utoipa::path(
    post,
    path = "/files",
    tag = "Files",
    summary = "Upload file",
    description = "Stores the raw request body under the given key, overwriting any \
                   existing content. The Content-Type header is preserved.",
    params(("key" = String, Query, description = "Storage key")),
    security(("session_token" = [])),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Invalid key", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 503, description = "File storage unavailable", body = ErrorResponse),
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");

    let metadata = state.blobs.upload(&query.key, body, content_type).await?;
    info!(key = %metadata.key, size = metadata.size_bytes, "file uploaded");

    Ok(Json(UploadResponse {
        url: state.blobs.public_url(&metadata.key),
        key: metadata.key,
        size_bytes: metadata.size_bytes,
    }))
}

/// `GET /files/{key}` -- fetch an uploaded file.
#[utoipa::path(
    get,
    path = "/files/{key}",
    tag = "Files",
    summary = "Download file",
    params(("key" = String, Path, description = "Storage key")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "No such file", body = ErrorResponse),
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let Some((metadata, data)) = state.blobs.get(&key).await? else {
        return Err(ServerError::NotFound(format!("no such file: {key}")));
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, metadata.content_type)],
        data,
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveFilesRequest {
    /// Storage keys to remove.
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveFilesResponse {
    /// Number of files actually removed.
    pub removed: u64,
}

/// `DELETE /files` -- remove uploaded files, best-effort.
#[utoipa::path(
    delete,
    path = "/files",
    tag = "Files",
    summary = "Remove files",
    description = "Removes the given keys. Missing keys and backend failures are \
                   skipped, not errors.",
    security(("session_token" = [])),
    request_body = RemoveFilesRequest,
    responses(
        (status = 200, description = "Removal outcome", body = RemoveFilesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    )
)]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveFilesRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let removed = state.blobs.remove(&body.keys).await;
    Ok(Json(RemoveFilesResponse { removed }))
}
