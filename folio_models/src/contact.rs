use chrono::{DateTime, Utc};

use crate::{
    email_address::EmailAddress,
    macros::{id, nutype_string},
};

id!(ContactMessageId);

/// A persisted contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

nutype_string!(ContactMessageAuthorName(
    validate(len_char_max = 256, predicate = |name| !name.trim().is_empty()),
));

nutype_string!(ContactMessageSubject(validate(len_char_max = 256),));

nutype_string!(ContactMessageContent(
    validate(len_char_max = 16384, predicate = |content| !content.trim().is_empty()),
));

impl Default for ContactMessageSubject {
    fn default() -> Self {
        Self::try_new(String::new()).unwrap()
    }
}
