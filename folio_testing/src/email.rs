use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;
use url::Url;

const SEND_ROUTE: &str = "/v3/smtp/email";
const ACCOUNT_ROUTE: &str = "/v3/account";
const OUTBOX_ROUTE: &str = "/testing/emails";

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting email testing server on {host}:{port}");
    info!("Email api endpoint: http://{host}:{port}/v3/");
    info!("Sent emails: http://{host}:{port}{OUTBOX_ROUTE}");
    info!("Api key: {api_key:?}");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(Arc::new(StateInner::new(api_key, None))))
        .await
        .context("Failed to start HTTP server")
}

/// Handle to an email testing server running in the background.
pub struct TestEmailServer {
    endpoint: Url,
    state: Arc<StateInner>,
}

impl TestEmailServer {
    /// Starts a server on a random local port. Every request to the email api
    /// is answered after `delay`.
    pub async fn spawn(api_key: &str, delay: Option<Duration>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .context("Failed to bind to local port")?;
        let addr = listener.local_addr()?;
        let state = Arc::new(StateInner::new(api_key.into(), delay));

        let router = router(Arc::clone(&state));
        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self {
            endpoint: format!("http://{addr}/v3/").parse()?,
            state,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns all emails that have been accepted so far.
    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.state.outbox.lock().await.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentEmail {
    pub sender: Contact,
    pub to: Vec<Contact>,
    pub reply_to: Option<Contact>,
    pub subject: String,
    pub html_content: Option<String>,
    pub text_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
}

struct StateInner {
    api_key: String,
    delay: Option<Duration>,
    outbox: Mutex<Vec<SentEmail>>,
}

impl StateInner {
    fn new(api_key: String, delay: Option<Duration>) -> Self {
        Self {
            api_key,
            delay,
            outbox: Default::default(),
        }
    }

    async fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let valid = headers
            .get("api-key")
            .is_some_and(|key| key.as_bytes() == self.api_key.as_bytes());
        if valid {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"code": "unauthorized", "message": "Key not found"})),
            )
                .into_response())
        }
    }
}

fn router(state: Arc<StateInner>) -> Router {
    Router::new()
        .route(SEND_ROUTE, routing::post(send))
        .route(ACCOUNT_ROUTE, routing::get(account))
        .route(OUTBOX_ROUTE, routing::get(outbox))
        .with_state(state)
}

async fn send(
    State(state): State<Arc<StateInner>>,
    headers: HeaderMap,
    Json(email): Json<SentEmail>,
) -> Response {
    if let Err(response) = state.authorize(&headers).await {
        return response;
    }

    if email.to.is_empty() || (email.html_content.is_none() && email.text_content.is_none()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "missing_parameter", "message": "to and content are required"})),
        )
            .into_response();
    }

    info!(
        to = ?email.to,
        subject = %email.subject,
        "accepted email"
    );

    let mut outbox = state.outbox.lock().await;
    outbox.push(email);
    let message_id = format!("<{}@folio.testing>", outbox.len());

    (StatusCode::CREATED, Json(json!({"messageId": message_id}))).into_response()
}

async fn account(State(state): State<Arc<StateInner>>, headers: HeaderMap) -> Response {
    if let Err(response) = state.authorize(&headers).await {
        return response;
    }

    Json(json!({"email": "testing@folio.local", "companyName": "Folio Testing"})).into_response()
}

async fn outbox(State(state): State<Arc<StateInner>>) -> Json<Vec<SentEmail>> {
    Json(state.outbox.lock().await.clone())
}
