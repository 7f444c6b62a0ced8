//! Phone-based identity helpers.
//!
//! Shoppers sign up and log in with a phone number. The identity record needs
//! an email, so one is derived from the phone digits.

use crate::error::CoreError;

/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Domain used for phone-derived identity emails.
pub const DEFAULT_EMAIL_DOMAIN: &str = "bakingtales.com";

/// Shown when a sign-up hits an existing phone number.
pub const PHONE_TAKEN: &str = "This phone number is already registered";

/// Shown for any login failure, so callers cannot tell which phones exist.
pub const INVALID_CREDENTIALS: &str = "Invalid phone number or password";

/// Strip everything but digits and require at least ten of them.
pub fn normalize_phone(raw: &str) -> Result<String, CoreError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return Err(CoreError::Validation(
            "Please enter a valid 10-digit phone number".to_string(),
        ));
    }
    Ok(digits)
}

/// `{digits}@{domain}`.
pub fn synthetic_email(phone_digits: &str, domain: &str) -> String {
    format!("{phone_digits}@{domain}")
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), CoreError> {
    if full_name.trim().is_empty() {
        return Err(CoreError::Validation("Full name is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formatting_is_stripped() {
        assert_eq!(normalize_phone("+91 98765-43210").unwrap(), "919876543210");
        assert_eq!(normalize_phone("(987) 654 3210").unwrap(), "9876543210");
    }

    #[test]
    fn test_short_phone_rejected() {
        let err = normalize_phone("98765 4321x").unwrap_err();
        assert!(err.to_string().contains("10-digit"));
        assert!(normalize_phone("").is_err());
    }

    #[test]
    fn test_synthetic_email_uses_digits() {
        assert_eq!(
            synthetic_email("9876543210", DEFAULT_EMAIL_DOMAIN),
            "9876543210@bakingtales.com"
        );
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_full_name_required() {
        assert!(validate_full_name("  ").is_err());
        assert!(validate_full_name("Asha").is_ok());
    }
}
