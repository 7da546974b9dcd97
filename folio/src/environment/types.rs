use folio_core_contact_impl::{
    notification::ContactNotificationServiceImpl, ContactFeatureServiceImpl,
};
use folio_core_health_impl::HealthFeatureServiceImpl;
use folio_email_impl::EmailServiceImpl;
use folio_persistence_postgres::{contact::PostgresContactRepository, PostgresDatabase};
use folio_shared_impl::{id::IdServiceImpl, time::TimeServiceImpl};
use folio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = folio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Persistence
pub type Database = PostgresDatabase;
pub type ContactRepo = PostgresContactRepository;

// Email
pub type Email = EmailServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;

// Shared
pub type Id = IdServiceImpl;
pub type Time = TimeServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Database, Email>;

pub type ContactFeature =
    ContactFeatureServiceImpl<Id, Time, Database, ContactRepo, ContactNotification>;
pub type ContactNotification = ContactNotificationServiceImpl<Template, Email>;
