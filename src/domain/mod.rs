pub mod submission;
pub mod subscriber_email;

pub use submission::Submission;
pub use subscriber_email::{is_valid_email, SubscriberEmail};
