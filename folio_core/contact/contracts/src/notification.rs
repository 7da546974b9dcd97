use std::future::Future;

use folio_models::contact::ContactMessage;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactNotificationService: Send + Sync + 'static {
    /// Returns whether notifications can be sent, i.e. the email provider
    /// is configured and the operator address is known.
    fn is_enabled(&self) -> bool;

    /// Send an email about the given contact message to the operator.
    fn notify(&self, message: &ContactMessage) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockContactNotificationService {
    pub fn with_is_enabled(mut self, enabled: bool) -> Self {
        self.expect_is_enabled().once().return_const(enabled);
        self
    }

    pub fn with_notify(mut self, message: ContactMessage, ok: bool) -> Self {
        self.expect_notify()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| {
                Box::pin(std::future::ready(if ok {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("operation timed out"))
                }))
            });
        self
    }
}
