//! External OAuth identity provider boundary.
//!
//! [`IdentityProvider`] is the seam between the auth handlers and whoever
//! actually authenticates users. [`HttpIdentityProvider`] speaks the
//! standard authorization-code flow (authorization redirect, token
//! endpoint, user-info endpoint) with [`reqwest`]; the defaults point at
//! Google.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

const DEFAULT_PROVIDER_NAME: &str = "google";
const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const DEFAULT_SCOPES: &str = "openid email profile";

/// Endpoints and credentials of the external identity provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Stored as `identities.provider` (default: `google`).
    pub provider_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: String,
}

impl OAuthConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var               | Default                        |
    /// |-----------------------|--------------------------------|
    /// | `OAUTH_PROVIDER`      | `google`                       |
    /// | `OAUTH_CLIENT_ID`     | (empty)                        |
    /// | `OAUTH_CLIENT_SECRET` | (empty)                        |
    /// | `OAUTH_AUTHORIZE_URL` | Google authorization endpoint  |
    /// | `OAUTH_TOKEN_URL`     | Google token endpoint          |
    /// | `OAUTH_USERINFO_URL`  | Google OpenID user-info        |
    /// | `OAUTH_SCOPES`        | `openid email profile`         |
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };
        Self {
            provider_name: var("OAUTH_PROVIDER", DEFAULT_PROVIDER_NAME),
            client_id: var("OAUTH_CLIENT_ID", ""),
            client_secret: var("OAUTH_CLIENT_SECRET", ""),
            authorize_url: var("OAUTH_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL),
            token_url: var("OAUTH_TOKEN_URL", DEFAULT_TOKEN_URL),
            userinfo_url: var("OAUTH_USERINFO_URL", DEFAULT_USERINFO_URL),
            scopes: var("OAUTH_SCOPES", DEFAULT_SCOPES),
        }
    }
}

/// The user as reported by the provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Errors from the identity provider boundary.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Identity provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    /// A configured endpoint is not a valid URL.
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The provider answered but left out something we need.
    #[error("Incomplete identity: {0}")]
    Incomplete(&'static str),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start sign-in. `state` must come back
    /// unchanged on the callback.
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<Url, OAuthError>;

    /// Exchange an authorization code for the signed-in identity.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExternalIdentity, OAuthError>;
}

// ---------------------------------------------------------------------------
// Authorization-code flow over HTTP
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OAuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(OAuthError::Provider {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<Url, OAuthError> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", self.config.scopes.as_str()),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )?;
        Ok(url)
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExternalIdentity, OAuthError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = Self::check_status(response).await?.json().await?;

        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        let info: UserInfo = Self::check_status(response).await?.json().await?;

        let email = info.email.ok_or(OAuthError::Incomplete("email"))?;
        tracing::debug!(provider = %self.config.provider_name, subject = %info.sub, "Code exchange succeeded");

        Ok(ExternalIdentity {
            provider: self.config.provider_name.clone(),
            subject: info.sub,
            email,
            display_name: info.name,
            avatar_url: info.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig {
            provider_name: "google".into(),
            client_id: "client-123".into(),
            client_secret: "shh".into(),
            authorize_url: DEFAULT_AUTHORIZE_URL.into(),
            token_url: DEFAULT_TOKEN_URL.into(),
            userinfo_url: DEFAULT_USERINFO_URL.into(),
            scopes: DEFAULT_SCOPES.into(),
        }
    }

    #[test]
    fn authorize_url_carries_client_redirect_and_state() {
        let provider = HttpIdentityProvider::new(config());
        let redirect = "http://localhost:3000/api/v1/auth/callback";
        let url = provider.authorize_url(redirect, "signed.state.value").unwrap();

        assert!(url.as_str().starts_with(DEFAULT_AUTHORIZE_URL));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "client-123".into())));
        assert!(pairs.contains(&("redirect_uri".into(), redirect.into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("state".into(), "signed.state.value".into())));
    }

    #[test]
    fn bad_authorize_endpoint_is_an_error() {
        let provider = HttpIdentityProvider::new(OAuthConfig {
            authorize_url: "not a url".into(),
            ..config()
        });
        assert!(matches!(
            provider.authorize_url("http://x", "s"),
            Err(OAuthError::InvalidUrl(_))
        ));
    }
}
