use std::net::IpAddr;

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    Router,
};
use folio_core_contact_contracts::ContactFeatureService;
use folio_core_health_contracts::HealthFeatureService;
use folio_di::Build;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call the api from a browser. Any origin is allowed
    /// (without credentials) if empty.
    pub allowed_origins: Vec<String>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let RestServerConfig { host, port, .. } = self.config;
        let router = self.router()?;

        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        info!("Starting REST API server on {host}:{port}");

        axum::serve(listener, router)
            .await
            .context("Failed to start HTTP server")
    }

    fn router(self) -> anyhow::Result<Router<()>> {
        let cors = cors_layer(&self.config.allowed_origins)?;

        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .layer(cors);

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::request_id::add(router);

        Ok(router)
    }
}

fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin: {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use folio_core_contact_contracts::MockContactFeatureService;
    use folio_core_health_contracts::MockHealthFeatureService;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    pub(crate) fn make_router(
        health: MockHealthFeatureService,
        contact: MockContactFeatureService,
        allowed_origins: &[&str],
    ) -> Router<()> {
        RestServer {
            health,
            contact,
            config: RestServerConfig {
                host: [127, 0, 0, 1].into(),
                port: 5000,
                allowed_origins: allowed_origins.iter().map(|&x| x.into()).collect(),
            },
        }
        .router()
        .unwrap()
    }

    pub(crate) async fn send(router: Router<()>, request: Request<Body>) -> Response {
        router.oneshot(request).await.unwrap()
    }

    pub(crate) async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/contact")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn cors_allowed_origin() {
        let router = make_router(
            MockHealthFeatureService::new(),
            MockContactFeatureService::new(),
            &["https://example.com"],
        );

        let response = send(router, preflight("https://example.com")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn cors_foreign_origin() {
        let router = make_router(
            MockHealthFeatureService::new(),
            MockContactFeatureService::new(),
            &["https://example.com"],
        );

        let response = send(router, preflight("https://evil.example.org")).await;

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn cors_any_origin() {
        let router = make_router(
            MockHealthFeatureService::new(),
            MockContactFeatureService::new(),
            &[],
        );

        let response = send(router, preflight("https://example.org")).await;

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
    }

    #[test]
    fn invalid_origin() {
        assert!(cors_layer(&["https://example.com\n".into()]).is_err());
    }

    #[tokio::test]
    async fn request_id() {
        let router = make_router(
            MockHealthFeatureService::new(),
            MockContactFeatureService::new(),
            &[],
        );

        let response = send(
            router,
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        )
        .await;

        assert!(response.headers().contains_key("X-Request-Id"));
    }

    #[tokio::test]
    async fn handler_panic() {
        let mut contact = MockContactFeatureService::new();
        contact
            .expect_submit()
            .returning(|_| panic!("contact service crashed"));
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        let response = send(
            router,
            Request::builder()
                .method(Method::POST)
                .uri("/api/contact")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Ann","email":"ann@example.com","message":"Hi"}"#,
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("X-Request-Id"));
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Internal server error"})
        );
    }
}
