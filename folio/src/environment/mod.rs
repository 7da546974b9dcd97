use std::sync::Arc;

use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::notification::ContactNotificationConfig;
use folio_core_health_impl::HealthFeatureConfig;
use folio_di::provider;
use types::{Database, Email};

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        database: Database,
        email: Email,
        ..config: ConfigProvider {
            RestServerConfig,
            ContactNotificationConfig,
            HealthFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, database: Database, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            database,
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        rest_server_config: RestServerConfig,
        contact_notification_config: ContactNotificationConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> Self {
        let rest_server_config = RestServerConfig {
            host: config.http.host,
            port: config.http.port,
            allowed_origins: config.http.allowed_origins.clone(),
        };

        let contact_notification_config = ContactNotificationConfig {
            recipient: config.contact_recipient().cloned().map(Arc::new),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Self {
            _cache: Default::default(),
            rest_server_config,
            contact_notification_config,
            health_feature_config,
        }
    }
}
