//! Request payload validation.
//!
//! Checks here are shape-only: they never touch storage. Failures are
//! collected per field so the client sees every problem at once.

use serde::Serialize;

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 32;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// `local@domain` with both parts non-empty and no whitespace.
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

pub(crate) fn validate_login(email: &str, password: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if !is_valid_email(email) {
        violations.push(FieldViolation::new("email", "must be a valid email address"));
    }
    if password.is_empty() {
        violations.push(FieldViolation::new("password", "must not be empty"));
    }
    violations
}

pub(crate) fn validate_refresh(refresh_token: &str) -> Vec<FieldViolation> {
    if refresh_token.trim().is_empty() {
        vec![FieldViolation::new("refresh_token", "must not be empty")]
    } else {
        Vec::new()
    }
}

pub(crate) fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    password_confirmation: &str,
    min_password_length: usize,
) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    let username_len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username_len) {
        violations.push(FieldViolation::new(
            "username",
            format!("must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"),
        ));
    }
    if !is_valid_email(email) {
        violations.push(FieldViolation::new("email", "must be a valid email address"));
    }
    if password.chars().count() < min_password_length {
        violations.push(FieldViolation::new(
            "password",
            format!("must be at least {min_password_length} characters"),
        ));
    }
    if password != password_confirmation {
        violations.push(FieldViolation::new(
            "password_confirmation",
            "must match password",
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(violations: &[FieldViolation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("johndoe@email.com"));
        assert!(is_valid_email("a@b"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("johndoe"));
        assert!(!is_valid_email("@email.com"));
        assert!(!is_valid_email("johndoe@"));
        assert!(!is_valid_email("john doe@email.com"));
        assert!(!is_valid_email("a@b@c"));
    }

    #[test]
    fn login_accepts_well_formed_input() {
        assert!(validate_login("johndoe@email.com", "12345678").is_empty());
    }

    #[test]
    fn login_reports_every_bad_field() {
        let violations = validate_login("not-an-email", "");
        assert_eq!(fields(&violations), ["email", "password"]);
    }

    #[test]
    fn refresh_requires_a_token() {
        assert!(validate_refresh("a.b.c").is_empty());
        assert_eq!(fields(&validate_refresh("  ")), ["refresh_token"]);
    }

    #[test]
    fn registration_accepts_well_formed_input() {
        let violations =
            validate_registration("JohnDoe", "johndoe@email.com", "12345678", "12345678", 8);
        assert!(violations.is_empty());
    }

    #[test]
    fn registration_username_bounds() {
        let too_long = "x".repeat(USERNAME_MAX_LEN + 1);
        for username in ["jd", too_long.as_str()] {
            let violations =
                validate_registration(username, "johndoe@email.com", "12345678", "12345678", 8);
            assert_eq!(fields(&violations), ["username"]);
        }
    }

    #[test]
    fn registration_password_rules() {
        let violations =
            validate_registration("JohnDoe", "johndoe@email.com", "1234567", "1234567", 8);
        assert_eq!(fields(&violations), ["password"]);

        let violations =
            validate_registration("JohnDoe", "johndoe@email.com", "12345678", "12345679", 8);
        assert_eq!(fields(&violations), ["password_confirmation"]);
    }
}
