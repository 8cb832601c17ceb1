// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface.
//!
//! | Method | Path | Guard |
//! |--------|------|-------|
//! | GET | `/curated-assets` | bearer |
//! | GET | `/xapp/ott/{token}` | `x-api-key` |
//! | POST | `/payload` | bearer |
//! | GET | `/payload/{payload_uuid}` | bearer |
//! | GET | `/rates/{currency}` | bearer |
//! | * | anything else | 404 |
//!
//! Guards are the `Bearer` / `ApiKeyHeader` extractors in each handler's
//! signature.

use axum::{
    extract::Request,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::API_KEY_HEADER,
    config::{CorsPolicy, RouterOptions},
    error::{ApiError, ErrorBody},
    state::AppState,
};

pub mod forward;
pub mod xapp;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState, options: RouterOptions) -> Router {
    let mut app = Router::new()
        .route("/curated-assets", get(forward::curated_assets))
        .route("/xapp/ott", get(xapp::exchange_missing_ott))
        .route("/xapp/ott/", get(xapp::exchange_missing_ott))
        .route("/xapp/ott/{token}", get(xapp::exchange_ott))
        .route("/payload", post(forward::create_payload))
        .route("/payload/{payload_uuid}", get(forward::get_payload))
        .route("/rates/{currency}", get(forward::get_rates))
        .route("/openapi.json", get(openapi_spec))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state);

    if options.api_docs {
        app = app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    app.layer(SetResponseHeaderLayer::if_not_present(
        X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    ))
    .layer(cors_layer(&options.cors))
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    }))
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ]);

    match policy {
        CorsPolicy::AnyOrigin => layer.allow_origin(Any),
        CorsPolicy::AllowList(origins) => layer.allow_origin(AllowOrigin::list(origins.clone())),
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "xApp Proxy",
        description = "Exchanges one-time tokens for session tokens and forwards platform calls with per-tenant credentials."
    ),
    paths(
        xapp::exchange_ott,
        forward::curated_assets,
        forward::create_payload,
        forward::get_payload,
        forward::get_rates
    ),
    components(schemas(ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "xApp", description = "One-time token exchange"),
        (name = "Platform", description = "Forwarded platform endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state_with_tenant;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app(options: RouterOptions) -> Router {
        router(state_with_tenant("http://127.0.0.1:9"), options)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = app(RouterOptions {
            api_docs: true,
            ..RouterOptions::default()
        });
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn unmatched_route_is_json_404() {
        let response = app(RouterOptions::default())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["msg"], "Not found");
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn wrong_method_is_json_404() {
        let response = app(RouterOptions::default())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/curated-assets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn responses_carry_security_headers_and_request_id() {
        let response = app(RouterOptions::default())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[REFERRER_POLICY], "no-referrer");
        assert!(headers.contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn inbound_request_id_is_propagated() {
        let response = app(RouterOptions::default())
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn cors_allow_list_echoes_known_origin_only() {
        let options = RouterOptions {
            cors: CorsPolicy::AllowList(vec![HeaderValue::from_static("http://localhost:8080")]),
            api_docs: false,
        };

        let preflight = |origin: &'static str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/curated-assets")
                .header("origin", origin)
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app(options.clone())
            .oneshot(preflight("http://localhost:8080"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "http://localhost:8080"
        );

        let denied = app(options)
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();
        assert!(!denied.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let response = app(RouterOptions::default())
            .oneshot(
                Request::builder()
                    .uri("/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body["paths"]["/xapp/ott/{token}"].is_object());
        assert!(body["paths"]["/payload/{payload_uuid}"].is_object());
        assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
