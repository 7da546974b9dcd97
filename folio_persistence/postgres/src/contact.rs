use bb8_postgres::tokio_postgres::{self, error::SqlState, Row};
use chrono::{DateTime, Utc};
use folio_di::Build;
use folio_models::contact::{
    ContactMessage, ContactMessageAuthor, ContactMessageId, ContactMessageSubject,
};
use folio_persistence_contracts::contact::{ContactRepoError, ContactRepository};
use folio_utils::trace_instrument;
use uuid::Uuid;

use crate::{arg_indices, columns, ColumnCounter, PostgresTransaction};

#[derive(Debug, Clone, Copy, Default, Build)]
pub struct PostgresContactRepository;

columns!(contact_message as "c": "id", "name", "email", "subject", "message", "created_at");

impl ContactRepository<PostgresTransaction> for PostgresContactRepository {
    #[trace_instrument(skip(self, txn))]
    async fn get(
        &self,
        txn: &mut PostgresTransaction,
        id: ContactMessageId,
    ) -> anyhow::Result<Option<ContactMessage>> {
        txn.txn()
            .query_opt(
                &format!("select {CONTACT_MESSAGE_COLS} from contact_messages c where id=$1"),
                &[&*id],
            )
            .await
            .map_err(Into::into)
            .and_then(|row| {
                row.map(|row| decode_contact_message(&row, &mut Default::default()))
                    .transpose()
            })
    }

    #[trace_instrument(skip(self, txn))]
    async fn list(
        &self,
        txn: &mut PostgresTransaction,
        limit: u64,
    ) -> anyhow::Result<Vec<ContactMessage>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        txn.txn()
            .query(
                &format!(
                    "select {CONTACT_MESSAGE_COLS} from contact_messages c order by created_at \
                     desc, id limit $1"
                ),
                &[&limit],
            )
            .await
            .map_err(Into::into)
            .and_then(|rows| {
                rows.into_iter()
                    .map(|row| decode_contact_message(&row, &mut Default::default()))
                    .collect()
            })
    }

    #[trace_instrument(skip(self, txn))]
    async fn create(
        &self,
        txn: &mut PostgresTransaction,
        message: &ContactMessage,
    ) -> Result<(), ContactRepoError> {
        txn.txn()
            .execute(
                &format!(
                    "insert into contact_messages ({CONTACT_MESSAGE_COL_NAMES}) values ({})",
                    arg_indices(1..=CONTACT_MESSAGE_CNT)
                ),
                &[
                    &*message.id,
                    &message.author.name.as_str(),
                    &message.author.email.as_str(),
                    &message.subject.as_str(),
                    &message.content.as_str(),
                    &message.created_at,
                ],
            )
            .await
            .map(|_| ())
            .map_err(map_contact_repo_error)
    }
}

fn decode_contact_message(row: &Row, cnt: &mut ColumnCounter) -> anyhow::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get::<_, Uuid>(cnt.idx()).into(),
        author: ContactMessageAuthor {
            name: row.get::<_, String>(cnt.idx()).try_into()?,
            email: row.get::<_, String>(cnt.idx()).try_into()?,
        },
        subject: ContactMessageSubject::try_from(row.get::<_, String>(cnt.idx()))?,
        content: row.get::<_, String>(cnt.idx()).try_into()?,
        created_at: row.get::<_, DateTime<Utc>>(cnt.idx()),
    })
}

fn map_contact_repo_error(err: tokio_postgres::Error) -> ContactRepoError {
    match err.code() {
        Some(&SqlState::UNIQUE_VIOLATION) => ContactRepoError::Conflict,
        _ => ContactRepoError::Other(err.into()),
    }
}
