use crate::errors::{Error, Result, ValidationError};

/// Shape check for an email address: `local@domain.tld`, no whitespace.
///
/// Deliverability is the notifier's problem; this only keeps obvious garbage
/// out of the store.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ValidationError::MissingField("email".to_string()).into());
    }

    let invalid = || Error::Validation(ValidationError::InvalidEmail(email.to_string()));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}
