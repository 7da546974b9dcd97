use std::future::Future;

use folio_models::contact::ContactMessage;
use thiserror::Error;

pub mod notification;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate a contact form submission, store it and notify the operator
    /// by email.
    ///
    /// Once stored, a message is never removed again, even if the
    /// notification fails.
    fn submit(
        &self,
        request: ContactSubmitRequest,
    ) -> impl Future<Output = Result<ContactSubmitOutcome, ContactSubmitError>> + Send;
}

/// Raw contact form submission. Absent fields are reported as validation
/// errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmitRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSubmitOutcome {
    /// The message has been stored and the operator has been notified.
    Sent(ContactMessage),
    /// The message has been stored, but notifications are not configured.
    SavedWithoutNotification(ContactMessage),
}

impl ContactSubmitOutcome {
    pub fn into_message(self) -> ContactMessage {
        match self {
            Self::Sent(message) | Self::SavedWithoutNotification(message) => message,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The submission is missing or has invalid fields: {0:?}")]
    Validation(Vec<ContactField>),
    #[error("Failed to save the contact message.")]
    Persistence(#[source] anyhow::Error),
    #[error("The contact message has been saved, but the notification could not be sent.")]
    Notification {
        saved: Box<ContactMessage>,
        #[source]
        source: anyhow::Error,
    },
}

/// Fields of a contact form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        request: ContactSubmitRequest,
        result: Result<ContactSubmitOutcome, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
