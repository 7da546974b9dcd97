use std::future::Future;

use folio_models::contact::{ContactMessage, ContactMessageId};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRepository<Txn: Send + Sync + 'static>: Send + Sync + 'static {
    /// Returns the contact message with the given id.
    fn get(
        &self,
        txn: &mut Txn,
        id: ContactMessageId,
    ) -> impl Future<Output = anyhow::Result<Option<ContactMessage>>> + Send;

    /// Returns the most recent contact messages, newest first.
    fn list(
        &self,
        txn: &mut Txn,
        limit: u64,
    ) -> impl Future<Output = anyhow::Result<Vec<ContactMessage>>> + Send;

    /// Stores a new contact message.
    fn create(
        &self,
        txn: &mut Txn,
        message: &ContactMessage,
    ) -> impl Future<Output = Result<(), ContactRepoError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactRepoError {
    #[error("A contact message with the same id already exists.")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl<Txn: Send + Sync + 'static> MockContactRepository<Txn> {
    pub fn with_create(
        mut self,
        message: ContactMessage,
        result: Result<(), ContactRepoError>,
    ) -> Self {
        self.expect_create()
            .once()
            .with(mockall::predicate::always(), mockall::predicate::eq(message))
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
