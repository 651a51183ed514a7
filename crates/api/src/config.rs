use raze_core::wizard::{WizardConfig, WizardVariant};

use crate::auth::jwt::JwtConfig;
use crate::auth::oauth::OAuthConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Pause between purges of expired or revoked sessions (default: `3600`).
    pub session_cleanup_interval_secs: u64,
    /// Externally reachable base URL of this server, used to build the OAuth
    /// callback URL.
    pub public_base_url: String,
    /// Emails that are granted the `admin` role on sign-in.
    pub admin_emails: Vec<String>,
    /// Wizard variant and gating.
    pub wizard: WizardConfig,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// External identity provider endpoints and credentials.
    pub oauth: OAuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                  |
    /// |-----------------------------------|--------------------------|
    /// | `HOST`                            | `0.0.0.0`                |
    /// | `PORT`                            | `3000`                   |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`           | `30`                     |
    /// | `SESSION_CLEANUP_INTERVAL_SECS`   | `3600`                   |
    /// | `PUBLIC_BASE_URL`                 | `http://localhost:3000`  |
    /// | `ADMIN_EMAILS`                    | (empty)                  |
    /// | `WIZARD_VARIANT`                  | `five_step`              |
    /// | `WIZARD_REQUIRE_PERSONAL_DETAILS` | `false`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let session_cleanup_interval_secs: u64 = std::env::var("SESSION_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_CLEANUP_INTERVAL_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let admin_emails = split_list(&std::env::var("ADMIN_EMAILS").unwrap_or_default());

        let variant = WizardVariant::parse(
            &std::env::var("WIZARD_VARIANT").unwrap_or_else(|_| "five_step".into()),
        )
        .expect("WIZARD_VARIANT must be five_step or four_step");

        let require_personal_details: bool = std::env::var("WIZARD_REQUIRE_PERSONAL_DETAILS")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("WIZARD_REQUIRE_PERSONAL_DETAILS must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            session_cleanup_interval_secs,
            public_base_url,
            admin_emails,
            wizard: WizardConfig::new(variant, require_personal_details),
            jwt: JwtConfig::from_env(),
            oauth: OAuthConfig::from_env(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(" a@x.io, ,b@x.io "),
            vec!["a@x.io".to_string(), "b@x.io".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
