//! Well-known role name constants.
//!
//! These must match the `identities.role` check constraint in
//! `20250301000001_create_identities.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Resolve the role for a signed-in email against the configured admin list.
///
/// Comparison is case-insensitive; surrounding whitespace is ignored.
pub fn role_for_email(email: &str, admin_emails: &[String]) -> &'static str {
    let email = email.trim();
    if admin_emails
        .iter()
        .any(|admin| admin.trim().eq_ignore_ascii_case(email))
    {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_email_matches_case_insensitively() {
        let admins = vec!["Ops@Raze.app".to_string()];
        assert_eq!(role_for_email("ops@raze.app", &admins), ROLE_ADMIN);
        assert_eq!(role_for_email("  OPS@raze.app ", &admins), ROLE_ADMIN);
    }

    #[test]
    fn other_emails_are_users() {
        let admins = vec!["ops@raze.app".to_string()];
        assert_eq!(role_for_email("someone@raze.app", &admins), ROLE_USER);
        assert_eq!(role_for_email("ops@raze.app", &[]), ROLE_USER);
    }
}
