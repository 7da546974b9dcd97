use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

/// Loose `local@domain.tld` shape check. This is a plausibility check for
/// the contact form, not RFC 5322 validation.
pub static EMAIL_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    sanitize(trim),
    validate(len_char_max = 256, regex = EMAIL_ADDRESS_REGEX),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Deref,
        AsRef,
        Display,
        FromStr,
        TryFrom,
        Serialize,
        Deserialize
    )
)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}
