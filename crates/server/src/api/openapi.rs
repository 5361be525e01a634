use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

use super::auth::{
    LoginRequest, LoginResponse, SessionTokenRequest, ValidateSessionResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};
use super::document::{
    DeleteItemRequest, DeleteItemResponse, PushItemRequest, SectionRequest, UpsertItemsRequest,
};
use super::files::{RemoveFilesRequest, RemoveFilesResponse, UploadResponse};
use super::health::HealthResponse;
use super::schemas::ErrorResponse;

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "0.1.0",
        description = "HTTP API for the folio portfolio backend: OTP-gated admin \
                       authentication, bilingual document editing, and file uploads.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Admin login, OTP verification, and sessions"),
        (name = "Document", description = "The portfolio document and its sections"),
        (name = "Files", description = "Uploaded file storage")
    ),
    paths(
        super::health::health,
        super::auth::login,
        super::auth::verify_otp,
        super::auth::validate_session,
        super::auth::logout,
        super::document::get_document,
        super::document::get_normalized,
        super::document::replace_document,
        super::document::replace_section,
        super::document::patch_section,
        super::document::push_item,
        super::document::upsert_items,
        super::document::delete_item,
        super::files::upload,
        super::files::download,
        super::files::remove,
    ),
    components(schemas(
        HealthResponse, ErrorResponse,
        LoginRequest, LoginResponse,
        VerifyOtpRequest, VerifyOtpResponse,
        SessionTokenRequest, ValidateSessionResponse,
        SectionRequest, PushItemRequest, UpsertItemsRequest,
        DeleteItemRequest, DeleteItemResponse,
        UploadResponse, RemoveFilesRequest, RemoveFilesResponse,
    )),
    modifiers(&SessionTokenSecurity)
)]
pub struct ApiDoc;

/// Registers the Bearer session-token scheme referenced by the protected
/// paths.
struct SessionTokenSecurity;

impl Modify for SessionTokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session token from /auth/verify-otp"))
                        .build(),
                ),
            );
        }
    }
}
