/// CORS decorator wrapped around the whole router
///
/// Requests carrying an `Origin` get permissive cross-origin headers echoing
/// that origin. Preflight `OPTIONS` requests are answered here and never
/// reach a handler.

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
        },
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
pub const ALLOWED_HEADERS: &str = "Accept, Accept-Language, Content-Type, YourOwnHeader";

pub async fn cors_decorator(req: Request, next: Next) -> Response {
    let origin = req.headers().get(ORIGIN).cloned();

    let mut response = if req.method() == Method::OPTIONS {
        tracing::debug!("Answering preflight for {}", req.uri().path());
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    if let Some(origin) = origin.filter(|o| !o.is_empty()) {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }

    response
}
