pub mod auth;
pub mod document;
pub mod files;
pub mod health;
pub mod openapi;
pub mod schemas;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use folio_auth::Authenticator;
use folio_blob::BlobStore;
use folio_document::DocumentService;

use crate::auth_layer::SessionLayer;

use self::openapi::ApiDoc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The session/OTP authenticator.
    pub auth: Arc<Authenticator>,
    /// The document merge service.
    pub documents: Arc<DocumentService>,
    /// Uploaded-file storage.
    pub blobs: Arc<dyn BlobStore>,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        // Health (always public)
        .route("/health", get(health::health))
        // Authentication flow
        .route("/auth/login", post(auth::login))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/validate-session", post(auth::validate_session))
        .route("/auth/logout", post(auth::logout))
        // Public read paths (the portfolio page itself)
        .route("/document", get(document::get_document))
        .route("/document/normalized", get(document::get_normalized))
        .route("/files/{*key}", get(files::download));

    let protected = Router::new()
        // Whole-document replace and item delete
        .route(
            "/document",
            put(document::replace_document).delete(document::delete_item),
        )
        // Section operations
        .route(
            "/document/sections",
            put(document::replace_section)
                .patch(document::patch_section)
                .post(document::push_item),
        )
        .route("/document/sections/items", put(document::upsert_items))
        // File uploads
        .route("/files", post(files::upload).delete(files::remove))
        // Every mutating route requires a live session token.
        .layer(SessionLayer::new(Arc::clone(&state.auth)));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
