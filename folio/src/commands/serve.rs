use folio_config::Config;
use folio_di::Provides;
use folio_email_contracts::EmailService;
use folio_persistence_contracts::Database;
use tracing::{info, warn};

use crate::{
    database, email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to database");
    let database = database::connect(&config.database).await?;
    database.ping().await?;

    info!("Applying pending migrations");
    let mut applied = false;
    for name in database.run_migrations(None).await? {
        info!("Applied {name}");
        applied = true;
    }
    if !applied {
        info!("No migrations pending");
    }

    let email = email::connect(&config)?;
    if !email.is_configured() {
        warn!("Email api key or sender address missing, contact notifications are disabled");
    } else if let Err(err) = email.ping().await {
        warn!("Email provider is not reachable: {err:#}");
    }
    if config.contact_recipient().is_none() {
        warn!("No contact address configured, contact notifications are disabled");
    }

    let config_provider = ConfigProvider::new(&config);
    let mut provider = Provider::new(config_provider, database, email);
    let server: RestServer = provider.provide();
    server.serve().await
}
