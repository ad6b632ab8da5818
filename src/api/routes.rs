//! Application route configuration.

use axum::{http::StatusCode, middleware, routing::get, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{sd_routes, user_routes};
use super::middleware::{
    handle_panic, no_cache, security_headers, version_header, MakeCorrelationId,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::types::ApiResponse;
use crate::version::VersionInfo;

const CORS_MAX_AGE: std::time::Duration = std::time::Duration::from_secs(86400);

/// Create the application router with all routes configured.
///
/// Swagger UI is mounted only when `debug` is set.
pub fn create_router(state: AppState, debug: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/version", get(version))
        .nest("/v1/user", user_routes())
        .nest("/sd", sd_routes());

    if debug {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .fallback(not_found)
        // Outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(middleware::from_fn(no_cache))
                .layer(cors())
                .layer(middleware::from_fn(security_headers))
                .layer(SetRequestIdLayer::x_request_id(MakeCorrelationId))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(version_header)),
        )
        .with_state(state)
}

fn cors() -> CorsLayer {
    use axum::http::{header, Method};

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .max_age(CORS_MAX_AGE)
}

#[derive(Serialize)]
struct Banner {
    text: &'static str,
}

/// Root endpoint
async fn root() -> ApiResponse<Banner> {
    ApiResponse::success(Banner {
        text: "Welcome to api server.",
    })
}

/// Build metadata
async fn version() -> ApiResponse<VersionInfo> {
    ApiResponse::success(VersionInfo::get())
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "The requested API does not exist.")
}
