use clap::Subcommand;
use folio_config::Config;
use folio_models::contact::ContactMessage;
use folio_persistence_contracts::{contact::ContactRepository, Database, Transaction};
use folio_persistence_postgres::contact::PostgresContactRepository;

use crate::database;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// List the most recent contact messages
    #[command(aliases(["ls", "l"]))]
    List {
        /// Maximum number of messages to print
        #[arg(short = 'n', long, default_value = "20")]
        limit: u64,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::List { limit } => list(config, limit).await,
        }
    }
}

async fn list(config: Config, limit: u64) -> anyhow::Result<()> {
    let db = database::connect(&config.database).await?;
    let mut txn = db.begin_transaction().await?;
    let messages = PostgresContactRepository.list(&mut txn, limit).await?;
    txn.rollback().await?;

    if messages.is_empty() {
        println!("No contact messages");
    }
    for message in &messages {
        print_message(message);
    }

    Ok(())
}

fn print_message(message: &ContactMessage) {
    println!(
        "[{}] {} <{}> ({})",
        message.created_at.to_rfc3339(),
        *message.author.name,
        message.author.email,
        *message.id,
    );
    if !message.subject.is_empty() {
        println!("Subject: {}", *message.subject);
    }
    for line in message.content.lines() {
        println!("    {line}");
    }
    println!();
}
