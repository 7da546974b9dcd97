use folio_models::contact::ContactMessage;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// A template is rendered verbatim, the template engine does not escape
/// anything. Templates producing markup must escape their values on
/// construction.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = stringify!($ident);
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactNotificationTemplate("contact_notification.html"),
    ContactNotificationTextTemplate("contact_notification.txt"),
}

/// HTML body of the notification sent to the operator for a new contact
/// message. All values are escaped, so fields can only be set through
/// [`ContactNotificationTemplate::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTemplate {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ContactNotificationTemplate {
    pub fn new(message: &ContactMessage) -> Self {
        Self {
            name: escape_html(&message.author.name),
            email: escape_html(message.author.email.as_str()),
            subject: escape_html(&message.subject),
            message: nl2br(&escape_html(&message.content)),
        }
    }
}

/// Plain text body of the notification sent to the operator for a new
/// contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTextTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactNotificationTextTemplate {
    pub fn new(message: &ContactMessage) -> Self {
        Self {
            name: (*message.author.name).clone(),
            email: message.author.email.as_str().into(),
            subject: (*message.subject).clone(),
            message: (*message.content).clone(),
        }
    }
}

/// Escapes the characters `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Replaces every line feed with a `<br/>` tag.
pub fn nl2br(text: &str) -> String {
    text.replace('\n', "<br/>")
}
