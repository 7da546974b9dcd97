use anyhow::ensure;
use clap::Subcommand;
use folio_config::Config;
use folio_email_contracts::{Email, EmailService};
use folio_models::email_address::EmailAddress;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddress },
    /// Verify the email api key
    Ping,
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
            EmailCommand::Ping => ping(config).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddress) -> anyhow::Result<()> {
    let email_service = email::connect(&config)?;
    ensure!(
        email_service.is_configured(),
        "Email api key or sender address missing"
    );

    let ok = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            text: "Email deliverability seems to be working!".into(),
            html: Some("<p>Email deliverability seems to be working!</p>".into()),
            reply_to: None,
        })
        .await?;

    ensure!(ok, "Failed to send email");
    println!("Email has been sent");

    Ok(())
}

async fn ping(config: Config) -> anyhow::Result<()> {
    let email_service = email::connect(&config)?;
    email_service.ping().await?;
    println!("Email provider accepted the api key");

    Ok(())
}
