use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{
    ContactFeatureService, ContactField, ContactSubmitError, ContactSubmitOutcome,
};
use tracing::debug;

use super::error;
use crate::{
    extractors::payload::Payload,
    models::{
        contact::{ApiContactSubmitRequest, ApiContactSubmitResponse},
        ApiError,
    },
};

const REQUIRED_FIELDS_ERROR: &str = "name, email and message are required";
const SUBMIT_FAILED_ERROR: &str = "Server error sending or saving message";
const NOTIFICATION_SKIPPED_WARNING: &str =
    "Email not sent: email api key or recipient address not configured on server.";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    payload: Result<Payload<ApiContactSubmitRequest>, Response>,
) -> Response {
    let request = match payload {
        Ok(Payload(request)) => request,
        Err(rejection) => {
            debug!(status = %rejection.status(), "rejected contact payload");
            return validation_error(&[]);
        }
    };

    match service.submit(request.into()).await {
        Ok(outcome) => {
            let (success, warning) = match outcome {
                ContactSubmitOutcome::Sent(_) => (Some(true), None),
                ContactSubmitOutcome::SavedWithoutNotification(_) => {
                    (None, Some(NOTIFICATION_SKIPPED_WARNING))
                }
            };
            let response = ApiContactSubmitResponse {
                saved: outcome.into_message().into(),
                success,
                warning,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(ContactSubmitError::Validation(fields)) => validation_error(&fields),
        Err(ContactSubmitError::Persistence(_) | ContactSubmitError::Notification { .. }) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, SUBMIT_FAILED_ERROR)
        }
    }
}

fn validation_error(fields: &[ContactField]) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: REQUIRED_FIELDS_ERROR,
            fields: Some(fields.iter().map(|field| field.as_str()).collect()),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use folio_core_contact_contracts::{ContactSubmitRequest, MockContactFeatureService};
    use folio_core_health_contracts::MockHealthFeatureService;
    use folio_demo::contact::{ANN, MAX};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::tests::{json_body, make_router, send};

    fn post(content_type: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        post("application/json", body.to_string())
    }

    fn max_request() -> ContactSubmitRequest {
        ContactSubmitRequest {
            name: Some("Max Mustermann".into()),
            email: Some("max.mustermann@example.de".into()),
            subject: Some("Project inquiry".into()),
            message: Some("Hello World!".into()),
        }
    }

    fn max_json() -> serde_json::Value {
        json!({
            "name": "Max Mustermann",
            "email": "max.mustermann@example.de",
            "subject": "Project inquiry",
            "message": "Hello World!",
        })
    }

    fn max_saved() -> serde_json::Value {
        json!({
            "id": "a8d95e0e-a0bb-4c8a-bd7e-7dd1f1c2a7a3",
            "name": "Max Mustermann",
            "email": "max.mustermann@example.de",
            "subject": "Project inquiry",
            "message": "Hello World!",
            "createdAt": "2023-11-14T23:13:20Z",
        })
    }

    #[tokio::test]
    async fn sent() {
        // Arrange
        let contact = MockContactFeatureService::new().with_submit(
            max_request(),
            Ok(ContactSubmitOutcome::Sent(MAX.clone())),
        );
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        // Act
        let response = send(router, post_json(max_json())).await;

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"saved": max_saved(), "success": true})
        );
    }

    #[tokio::test]
    async fn saved_without_notification() {
        // Arrange
        let contact = MockContactFeatureService::new().with_submit(
            max_request(),
            Ok(ContactSubmitOutcome::SavedWithoutNotification(MAX.clone())),
        );
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        // Act
        let response = send(router, post_json(max_json())).await;

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"saved": max_saved(), "warning": NOTIFICATION_SKIPPED_WARNING})
        );
    }

    #[tokio::test]
    async fn validation_failed() {
        // Arrange
        let request = ContactSubmitRequest {
            name: None,
            email: Some("ann".into()),
            subject: None,
            message: Some("Hi".into()),
        };
        let contact = MockContactFeatureService::new().with_submit(
            request,
            Err(ContactSubmitError::Validation(vec![
                ContactField::Name,
                ContactField::Email,
            ])),
        );
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        // Act
        let response = send(router, post_json(json!({"email": "ann", "message": "Hi"}))).await;

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": REQUIRED_FIELDS_ERROR, "fields": ["name", "email"]})
        );
    }

    #[tokio::test]
    async fn malformed_json() {
        // Arrange
        let router = make_router(
            MockHealthFeatureService::new(),
            MockContactFeatureService::new(),
            &[],
        );

        // Act
        let response = send(router, post("application/json", "{\"name\": ")).await;

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": REQUIRED_FIELDS_ERROR, "fields": []})
        );
    }

    #[tokio::test]
    async fn form() {
        // Arrange
        let request = ContactSubmitRequest {
            name: Some("Ann".into()),
            email: Some("ann@example.com".into()),
            subject: None,
            message: Some("Hi\nthere".into()),
        };
        let contact = MockContactFeatureService::new().with_submit(
            request,
            Ok(ContactSubmitOutcome::Sent(ANN.clone())),
        );
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        // Act
        let response = send(
            router,
            post(
                "application/x-www-form-urlencoded",
                "name=Ann&email=ann%40example.com&message=Hi%0Athere",
            ),
        )
        .await;

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["saved"]["subject"], "");
        assert_eq!(body["saved"]["message"], "Hi\nthere");
    }

    #[tokio::test]
    async fn persistence_failed() {
        // Arrange
        let contact = MockContactFeatureService::new().with_submit(
            max_request(),
            Err(ContactSubmitError::Persistence(anyhow::anyhow!(
                "database unavailable"
            ))),
        );
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        // Act
        let response = send(router, post_json(max_json())).await;

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": SUBMIT_FAILED_ERROR})
        );
    }

    #[tokio::test]
    async fn notification_failed() {
        // Arrange
        let contact = MockContactFeatureService::new().with_submit(
            max_request(),
            Err(ContactSubmitError::Notification {
                saved: MAX.clone().into(),
                source: anyhow::anyhow!("operation timed out"),
            }),
        );
        let router = make_router(MockHealthFeatureService::new(), contact, &[]);

        // Act
        let response = send(router, post_json(max_json())).await;

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": SUBMIT_FAILED_ERROR})
        );
    }
}
