use std::sync::Arc;

use anyhow::{bail, Context};
use folio_core_contact_contracts::notification::ContactNotificationService;
use folio_di::Build;
use folio_email_contracts::{Email, EmailService};
use folio_models::{contact::ContactMessage, email_address::EmailAddress};
use folio_templates_contracts::{
    ContactNotificationTemplate, ContactNotificationTextTemplate, TemplateService,
};
use folio_utils::trace_instrument;

#[derive(Debug, Clone, Build)]
pub struct ContactNotificationServiceImpl<Template, Email> {
    template: Template,
    email: Email,
    config: ContactNotificationConfig,
}

#[derive(Debug, Clone)]
pub struct ContactNotificationConfig {
    /// Address of the operator who receives the notifications
    pub recipient: Option<Arc<EmailAddress>>,
}

impl<TemplateS, EmailS> ContactNotificationService
    for ContactNotificationServiceImpl<TemplateS, EmailS>
where
    TemplateS: TemplateService,
    EmailS: EmailService,
{
    fn is_enabled(&self) -> bool {
        self.config.recipient.is_some() && self.email.is_configured()
    }

    #[trace_instrument(skip(self))]
    async fn notify(&self, message: &ContactMessage) -> anyhow::Result<()> {
        let recipient = self
            .config
            .recipient
            .as_deref()
            .cloned()
            .context("No recipient for contact notifications configured")?;

        let subject = if message.subject.is_empty() {
            format!("New contact message from {}", *message.author.name)
        } else {
            (*message.subject).clone()
        };

        let html = self
            .template
            .render(&ContactNotificationTemplate::new(message))
            .context("Failed to render html notification")?;
        let text = self
            .template
            .render(&ContactNotificationTextTemplate::new(message))
            .context("Failed to render text notification")?;

        let email = Email {
            recipient,
            subject,
            text,
            html: Some(html),
            reply_to: Some(message.author.email.clone()),
        };

        if !self.email.send(email).await? {
            bail!("The email provider rejected the contact notification");
        }

        Ok(())
    }
}
