//! Master-password authentication for the admin panel.
//!
//! Login is a yes/no check; no session or token is issued. The admin client
//! keeps the result in memory for the duration of its session.

use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::LoginResult;

/// Check a submitted password against the configured master password.
pub fn verify_password(expected: Option<&str>, provided: &str) -> Result<LoginResult, AppError> {
    let Some(expected) = expected else {
        tracing::error!("Master password is not configured (SITE_MASTER_PASSWORD)");
        return Err(AppError::Config("Server configuration error.".to_string()));
    };

    if constant_time_compare(provided, expected) {
        Ok(LoginResult::ok())
    } else {
        tracing::warn!("Rejected admin login attempt");
        Err(AppError::Unauthorized("Invalid credentials".to_string()))
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_verify_password() {
        assert_eq!(verify_password(Some("abc"), "abc").unwrap(), LoginResult::ok());
        assert!(matches!(
            verify_password(Some("abc"), "wrong"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            verify_password(None, "abc"),
            Err(AppError::Config(_))
        ));
    }
}
