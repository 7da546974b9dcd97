use folio_core_contact_contracts::{
    notification::ContactNotificationService, ContactFeatureService, ContactField,
    ContactSubmitError, ContactSubmitOutcome, ContactSubmitRequest,
};
use folio_di::Build;
use folio_models::{
    contact::{
        ContactMessage, ContactMessageAuthor, ContactMessageAuthorName, ContactMessageContent,
        ContactMessageSubject,
    },
    email_address::EmailAddress,
};
use folio_persistence_contracts::{contact::ContactRepository, Database, Transaction};
use folio_shared_contracts::{id::IdService, time::TimeService};
use folio_utils::trace_instrument;
use tracing::{error, warn};

pub mod notification;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Default, Build)]
pub struct ContactFeatureServiceImpl<Id, Time, Db, ContactRepo, ContactNotification> {
    id: Id,
    time: Time,
    db: Db,
    contact_repo: ContactRepo,
    contact_notification: ContactNotification,
}

impl<Id, Time, Db, ContactRepo, ContactNotification> ContactFeatureService
    for ContactFeatureServiceImpl<Id, Time, Db, ContactRepo, ContactNotification>
where
    Id: IdService,
    Time: TimeService,
    Db: Database,
    ContactRepo: ContactRepository<Db::Transaction>,
    ContactNotification: ContactNotificationService,
{
    #[trace_instrument(skip(self))]
    async fn submit(
        &self,
        request: ContactSubmitRequest,
    ) -> Result<ContactSubmitOutcome, ContactSubmitError> {
        let ValidSubmission {
            author,
            subject,
            content,
        } = validate(request).map_err(ContactSubmitError::Validation)?;

        let message = ContactMessage {
            id: self.id.generate(),
            author,
            subject,
            content,
            created_at: self.time.now(),
        };

        self.save(&message).await.map_err(|err| {
            error!(id = ?message.id, "Failed to save contact message: {err:?}");
            ContactSubmitError::Persistence(err)
        })?;

        if !self.contact_notification.is_enabled() {
            warn!(
                id = ?message.id,
                "Contact message saved, but notifications are not configured"
            );
            return Ok(ContactSubmitOutcome::SavedWithoutNotification(message));
        }

        match self.contact_notification.notify(&message).await {
            Ok(()) => Ok(ContactSubmitOutcome::Sent(message)),
            Err(err) => {
                error!(id = ?message.id, "Failed to send contact notification: {err:?}");
                Err(ContactSubmitError::Notification {
                    saved: message.into(),
                    source: err,
                })
            }
        }
    }
}

impl<Id, Time, Db, ContactRepo, ContactNotification>
    ContactFeatureServiceImpl<Id, Time, Db, ContactRepo, ContactNotification>
where
    Db: Database,
    ContactRepo: ContactRepository<Db::Transaction>,
{
    async fn save(&self, message: &ContactMessage) -> anyhow::Result<()> {
        let mut txn = self.db.begin_transaction().await?;
        self.contact_repo.create(&mut txn, message).await?;
        txn.commit().await
    }
}

struct ValidSubmission {
    author: ContactMessageAuthor,
    subject: ContactMessageSubject,
    content: ContactMessageContent,
}

/// Checks all fields of a submission and collects every missing or invalid
/// field.
fn validate(request: ContactSubmitRequest) -> Result<ValidSubmission, Vec<ContactField>> {
    let mut invalid = Vec::new();

    let name = request
        .name
        .and_then(|name| ContactMessageAuthorName::try_new(name).ok());
    let email = request
        .email
        .and_then(|email| EmailAddress::try_new(email).ok());
    let subject = match request.subject {
        Some(subject) => ContactMessageSubject::try_new(subject).ok(),
        None => Some(ContactMessageSubject::default()),
    };
    let content = request
        .message
        .and_then(|message| ContactMessageContent::try_new(message).ok());

    if name.is_none() {
        invalid.push(ContactField::Name);
    }
    if email.is_none() {
        invalid.push(ContactField::Email);
    }
    if subject.is_none() {
        invalid.push(ContactField::Subject);
    }
    if content.is_none() {
        invalid.push(ContactField::Message);
    }

    match (name, email, subject, content) {
        (Some(name), Some(email), Some(subject), Some(content)) => Ok(ValidSubmission {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        }),
        _ => Err(invalid),
    }
}
