//! Email delivery adapters implementing `ratecast_core`'s `NotifierTrait`.
//!
//! - [`MailgunNotifier`]: delivers through the Mailgun messages API
//! - [`LogNotifier`]: logs the message instead of sending it

mod log_notifier;
mod mailgun;

pub use log_notifier::LogNotifier;
pub use mailgun::{MailgunConfig, MailgunError, MailgunNotifier, DEFAULT_MAILGUN_API_BASE};
