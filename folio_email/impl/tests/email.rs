use std::time::Duration;

use folio_email_contracts::{Email, EmailService};
use folio_email_impl::{EmailServiceConfig, EmailServiceImpl};
use folio_testing::email::{Contact, SentEmail, TestEmailServer};
use pretty_assertions::assert_eq;

const API_KEY: &str = "test-api-key";
const SENDER: &str = "folio@example.com";

#[tokio::test]
async fn send_email() {
    // Arrange
    let server = TestEmailServer::spawn(API_KEY, None).await.unwrap();
    let sut = make_sut(&server, API_KEY, Duration::from_secs(10));

    // Act
    let result = sut.send(make_email()).await.unwrap();

    // Assert
    assert!(result);
    assert_eq!(
        server.sent_emails().await,
        [SentEmail {
            sender: Contact {
                email: SENDER.into()
            },
            to: vec![Contact {
                email: "me@example.com".into()
            }],
            reply_to: Some(Contact {
                email: "ann@example.com".into()
            }),
            subject: "Hello".into(),
            html_content: Some("<p>Hi</p>".into()),
            text_content: Some("Hi".into()),
        }]
    );
}

#[tokio::test]
async fn send_text_only() {
    // Arrange
    let server = TestEmailServer::spawn(API_KEY, None).await.unwrap();
    let sut = make_sut(&server, API_KEY, Duration::from_secs(10));

    let email = Email {
        html: None,
        reply_to: None,
        ..make_email()
    };

    // Act
    let result = sut.send(email).await.unwrap();

    // Assert
    assert!(result);
    let sent = server.sent_emails().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_to, None);
    assert_eq!(sent[0].html_content, None);
}

#[tokio::test]
async fn send_rejected() {
    // Arrange
    let server = TestEmailServer::spawn(API_KEY, None).await.unwrap();
    let sut = make_sut(&server, "wrong-key", Duration::from_secs(10));

    // Act
    let result = sut.send(make_email()).await.unwrap();

    // Assert
    assert!(!result);
    assert!(server.sent_emails().await.is_empty());
}

#[tokio::test]
async fn send_timeout() {
    // Arrange
    let server = TestEmailServer::spawn(API_KEY, Some(Duration::from_secs(2)))
        .await
        .unwrap();
    let sut = make_sut(&server, API_KEY, Duration::from_millis(100));

    // Act
    let result = sut.send(make_email()).await;

    // Assert
    assert!(result.is_err());
}

#[tokio::test]
async fn ping() {
    let server = TestEmailServer::spawn(API_KEY, None).await.unwrap();

    make_sut(&server, API_KEY, Duration::from_secs(10))
        .ping()
        .await
        .unwrap();
    make_sut(&server, "wrong-key", Duration::from_secs(10))
        .ping()
        .await
        .unwrap_err();
}

fn make_sut(server: &TestEmailServer, api_key: &str, timeout: Duration) -> EmailServiceImpl {
    let config = EmailServiceConfig::new(
        api_key.into(),
        SENDER.parse().unwrap(),
        Some(server.endpoint().clone()),
        timeout,
    )
    .unwrap();
    EmailServiceImpl::new(Some(config))
}

fn make_email() -> Email {
    Email {
        recipient: "me@example.com".parse().unwrap(),
        subject: "Hello".into(),
        text: "Hi".into(),
        html: Some("<p>Hi</p>".into()),
        reply_to: Some("ann@example.com".parse().unwrap()),
    }
}
