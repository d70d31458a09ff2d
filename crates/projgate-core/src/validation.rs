//! Input rules shared by every layer.
//!
//! Request schemas are validated upstream; these checks run again at the
//! engine boundary so a store never sees a blank name.

use crate::error::{CoreError, Result};

/// Default upper bound on project name length, in characters.
pub const MAX_PROJECT_NAME_LEN: usize = 255;

/// Validate a project name and return it trimmed.
pub fn validate_project_name(name: &str, max_len: usize) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidName("name must not be empty".into()));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(CoreError::InvalidName(format!(
            "name is {} characters, maximum is {}",
            len, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Canonical form of an email: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check that an email has a non-empty local part and domain around a single `@`.
pub fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(CoreError::InvalidEmail(email.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blank_names_rejected() {
        assert!(validate_project_name("", MAX_PROJECT_NAME_LEN).is_err());
        assert!(validate_project_name("   ", MAX_PROJECT_NAME_LEN).is_err());
    }

    #[test]
    fn test_name_trimmed() {
        assert_eq!(
            validate_project_name("  Alpha ", MAX_PROJECT_NAME_LEN).unwrap(),
            "Alpha"
        );
    }

    #[test]
    fn test_name_too_long() {
        let name = "x".repeat(11);
        assert!(matches!(
            validate_project_name(&name, 10),
            Err(CoreError::InvalidName(_))
        ));
        assert!(validate_project_name(&name[..10], 10).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("u2@example.com").is_ok());
        assert!(validate_email("u2example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("u2@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  U2@Example.COM "), "u2@example.com");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(email in "[ A-Za-z0-9.@]{0,40}") {
            let once = normalize_email(&email);
            prop_assert_eq!(normalize_email(&once), once);
        }
    }
}
