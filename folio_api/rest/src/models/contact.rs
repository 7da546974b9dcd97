use chrono::{DateTime, Utc};
use folio_core_contact_contracts::ContactSubmitRequest;
use folio_models::contact::ContactMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactSubmitRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl From<ApiContactSubmitRequest> for ContactSubmitRequest {
    fn from(value: ApiContactSubmitRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ApiContactMessage {
    fn from(value: ContactMessage) -> Self {
        Self {
            id: *value.id,
            name: value.author.name.into_inner(),
            email: value.author.email.into_inner(),
            subject: value.subject.into_inner(),
            message: value.content.into_inner(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactSubmitResponse {
    pub saved: ApiContactMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}
