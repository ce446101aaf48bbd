//! src/domain/subscriber_email.rs

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic, not RFC 5322: `local@domain.tld` without whitespace.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Trims `s` and checks it against [`is_valid_email`].
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !is_valid_email(trimmed) {
            return Err(format!("{} is not a valid subscriber email.", s));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
