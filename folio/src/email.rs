use folio_config::Config;
use folio_email_impl::{EmailServiceConfig, EmailServiceImpl};

/// Creates the email client. The client stays unconfigured if the api key or
/// the sender address is missing.
pub fn connect(config: &Config) -> anyhow::Result<EmailServiceImpl> {
    let api_key = config
        .email
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty());

    let email_config = match (api_key, config.email_sender()) {
        (Some(api_key), Some(sender)) => Some(EmailServiceConfig::new(
            api_key.into(),
            sender.clone(),
            config.email.endpoint_override.clone(),
            config.email.timeout.into(),
        )?),
        _ => None,
    };

    Ok(EmailServiceImpl::new(email_config))
}
