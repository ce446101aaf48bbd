//! src/domain/submission.rs

use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;

/// A waitlist signup as forwarded to the webhook. Lives for one request only.
#[derive(Debug)]
pub struct Submission {
    pub email: SubscriberEmail,
    pub source: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(serde::Serialize)]
struct SubmissionPayload<'a> {
    email: &'a str,
    source: &'a str,
    ts: i64,
}

impl Submission {
    pub fn new(email: SubscriberEmail, source: impl Into<String>) -> Self {
        Self {
            email,
            source: source.into(),
            submitted_at: Utc::now(),
        }
    }

    /// `{"email", "source", "ts"}` with `ts` in epoch milliseconds.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SubmissionPayload {
            email: self.email.as_ref(),
            source: &self.source,
            ts: self.submitted_at.timestamp_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn the_payload_carries_email_source_and_epoch_millis() {
        let submission = Submission {
            email: SubscriberEmail::parse("user@example.com".into()).unwrap(),
            source: "mappli.co".into(),
            submitted_at: Utc.timestamp_millis_opt(1_767_225_600_123).unwrap(),
        };

        let payload: serde_json::Value =
            serde_json::from_str(&submission.to_json().unwrap()).unwrap();

        assert_eq!(
            payload,
            serde_json::json!({
                "email": "user@example.com",
                "source": "mappli.co",
                "ts": 1_767_225_600_123_i64,
            })
        );
    }

    #[test]
    fn new_submissions_are_stamped_with_the_current_time() {
        let before = Utc::now().timestamp_millis();
        let submission = Submission::new(
            SubscriberEmail::parse("user@example.com".into()).unwrap(),
            "mappli.co",
        );
        let after = Utc::now().timestamp_millis();

        let ts = submission.submitted_at.timestamp_millis();
        assert!(before <= ts && ts <= after);
    }
}
