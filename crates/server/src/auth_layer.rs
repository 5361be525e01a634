use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};

use folio_auth::Authenticator;

/// The authenticated admin, injected as a request extension by
/// [`SessionLayer`].
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub user_id: String,
    /// Absolute session lifetime left at the time of this request.
    pub remaining: Duration,
}

/// Tower layer guarding the mutating document and file routes.
///
/// Every request through this layer validates the Bearer session token,
/// which also bumps the session's inactivity clock, so continued editing
/// keeps the session alive.
#[derive(Clone)]
pub struct SessionLayer {
    auth: Arc<Authenticator>,
}

impl SessionLayer {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self { auth }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            auth: Arc::clone(&self.auth),
        }
    }
}

/// Tower service that authenticates requests.
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    auth: Arc<Authenticator>,
}

impl<S> Service<Request<Body>> for SessionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let auth = Arc::clone(&self.auth);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "));

            let Some(token) = token else {
                return Ok(unauthorized("missing Bearer token"));
            };

            match auth.validate_session(token).await {
                Ok(status) => {
                    req.extensions_mut().insert(AdminIdentity {
                        user_id: status.user_id,
                        remaining: status.remaining,
                    });
                    inner.call(req).await
                }
                Err(e) => Ok(unauthorized(&e.to_string())),
            }
        })
    }
}

fn unauthorized(message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}
