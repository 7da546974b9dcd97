use folio_core_contact_contracts::{
    notification::MockContactNotificationService, ContactSubmitRequest,
};
use folio_models::contact::ContactMessage;
use folio_persistence_contracts::{contact::MockContactRepository, MockDatabase, MockTransaction};
use folio_shared_contracts::{id::MockIdService, time::MockTimeService};

use crate::ContactFeatureServiceImpl;


type Sut = ContactFeatureServiceImpl<
    MockIdService,
    MockTimeService,
    MockDatabase,
    MockContactRepository<MockTransaction>,
    MockContactNotificationService,
>;

fn request(message: &ContactMessage) -> ContactSubmitRequest {
    ContactSubmitRequest {
        name: Some((*message.author.name).clone()),
        email: Some(message.author.email.as_str().into()),
        subject: Some((*message.subject).clone()),
        message: Some((*message.content).clone()),
    }
}
