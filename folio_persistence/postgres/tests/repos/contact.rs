use folio_demo::{
    contact::{ALL_MESSAGES, ANN, MALLORY, MAX},
    UUID1,
};
use folio_models::contact::ContactMessage;
use folio_persistence_contracts::{
    contact::{ContactRepoError, ContactRepository},
    Database, Transaction,
};
use folio_persistence_postgres::contact::PostgresContactRepository;
use folio_utils::assert_matches;
use pretty_assertions::assert_eq;

use crate::common::setup;

const REPO: PostgresContactRepository = PostgresContactRepository;

#[tokio::test]
#[ignore = "requires a postgres database (FOLIO_DATABASE__URL)"]
async fn get() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    for &message in &*ALL_MESSAGES {
        let result = REPO.get(&mut txn, message.id).await.unwrap().unwrap();
        assert_eq!(&result, message);
    }

    let result = REPO.get(&mut txn, UUID1.into()).await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
#[ignore = "requires a postgres database (FOLIO_DATABASE__URL)"]
async fn list() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let result = REPO.list(&mut txn, 100).await.unwrap();
    assert_eq!(result, [MALLORY.clone(), MAX.clone(), ANN.clone()]);

    let result = REPO.list(&mut txn, 1).await.unwrap();
    assert_eq!(result, [MALLORY.clone()]);
}

#[tokio::test]
#[ignore = "requires a postgres database (FOLIO_DATABASE__URL)"]
async fn create() {
    let db = setup().await;

    let message = ContactMessage {
        id: UUID1.into(),
        ..ANN.clone()
    };

    let mut txn = db.begin_transaction().await.unwrap();
    REPO.create(&mut txn, &message).await.unwrap();
    txn.commit().await.unwrap();

    let mut txn = db.begin_transaction().await.unwrap();
    let result = REPO.get(&mut txn, message.id).await.unwrap();
    assert_eq!(result, Some(message));
}

#[tokio::test]
#[ignore = "requires a postgres database (FOLIO_DATABASE__URL)"]
async fn create_conflict() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let result = REPO.create(&mut txn, &ANN).await;
    assert_matches!(result, Err(ContactRepoError::Conflict));
}

#[tokio::test]
#[ignore = "requires a postgres database (FOLIO_DATABASE__URL)"]
async fn rollback_discards() {
    let db = setup().await;

    let message = ContactMessage {
        id: UUID1.into(),
        ..MAX.clone()
    };

    let mut txn = db.begin_transaction().await.unwrap();
    REPO.create(&mut txn, &message).await.unwrap();
    txn.rollback().await.unwrap();

    let mut txn = db.begin_transaction().await.unwrap();
    let result = REPO.get(&mut txn, message.id).await.unwrap();
    assert_eq!(result, None);
}
