//! Email address utilities for the authentication service.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regular expression for a practical email shape: local part, one @, dotted
/// domain. Deliverability is proven by the OTP round trip, not the regex.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").unwrap()
});

/// Check whether a string looks like a valid email address
pub fn validate_email(email: &str) -> bool {
    email.len() <= 255 && EMAIL_REGEX.is_match(email)
}

/// Mask an email address for logging
///
/// Keeps the first and last character of the local part and the full domain:
/// `alice@example.com` becomes `a***e@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 2 => {
            let first = local.chars().next().unwrap();
            let last = local.chars().last().unwrap();
            format!("{}***{}@{}", first, last, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}
