use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use folio_models::contact::{ContactMessage, ContactMessageAuthor};
use folio_persistence_contracts::contact::ContactRepository;
use uuid::uuid;

pub static ANN: LazyLock<ContactMessage> = LazyLock::new(|| ContactMessage {
    id: uuid!("c4dba95e-8498-40fb-8412-7faecaf94787").into(),
    author: ContactMessageAuthor {
        name: "Ann".try_into().unwrap(),
        email: "ann@example.com".parse().unwrap(),
    },
    subject: Default::default(),
    content: "Hi\nthere".try_into().unwrap(),
    created_at: timestamp(1_700_000_000),
});

pub static MAX: LazyLock<ContactMessage> = LazyLock::new(|| ContactMessage {
    id: uuid!("a8d95e0e-a0bb-4c8a-bd7e-7dd1f1c2a7a3").into(),
    author: ContactMessageAuthor {
        name: "Max Mustermann".try_into().unwrap(),
        email: "max.mustermann@example.de".parse().unwrap(),
    },
    subject: "Project inquiry".try_into().unwrap(),
    content: "Hello World!".try_into().unwrap(),
    created_at: timestamp(1_700_003_600),
});

/// A submission whose fields contain markup and quotes.
pub static MALLORY: LazyLock<ContactMessage> = LazyLock::new(|| ContactMessage {
    id: uuid!("5f0fdaf4-3c1e-4f07-9d44-5a0a0e58c2f1").into(),
    author: ContactMessageAuthor {
        name: "<b>x</b>".try_into().unwrap(),
        email: "mallory@example.com".parse().unwrap(),
    },
    subject: "Tom & \"Jerry\"".try_into().unwrap(),
    content: "<script>alert('hi')</script>".try_into().unwrap(),
    created_at: timestamp(1_700_007_200),
});

pub static ALL_MESSAGES: LazyLock<Vec<&ContactMessage>> =
    LazyLock::new(|| vec![&*ANN, &*MAX, &*MALLORY]);

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub async fn create<Txn: Send + Sync + 'static>(
    txn: &mut Txn,
    repo: impl ContactRepository<Txn>,
) -> anyhow::Result<()> {
    for &message in &*ALL_MESSAGES {
        repo.create(txn, message).await?;
    }
    Ok(())
}
