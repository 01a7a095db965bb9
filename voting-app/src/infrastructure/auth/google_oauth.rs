use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use voting_errors::AppError;

use crate::config::{AppConfig, ConfigError};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String, // Google's unique user ID
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleUserInfo {
    /// Falls back to the email's local part when the profile has no name.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// What the login route needs: where to send the browser, plus the secrets to keep
/// in the session until the callback comes back.
pub struct LoginRedirect {
    pub url: String,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

#[derive(Clone)]
pub struct GoogleOAuth {
    client: ConfiguredClient,
    redirect_uri: RedirectUrl,
    http_client: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Result<Self, ConfigError> {
        let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
            .map_err(|e| ConfigError::Invalid("GOOGLE_AUTH_URL", e.to_string()))?;
        let token_url = TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
            .map_err(|e| ConfigError::Invalid("GOOGLE_TOKEN_URL", e.to_string()))?;
        let redirect = RedirectUrl::new(redirect_uri.to_string())
            .map_err(|e| ConfigError::Invalid("GOOGLE_REDIRECT_URI", e.to_string()))?;

        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        Ok(Self {
            client,
            redirect_uri: redirect,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.google_client_id,
            &config.google_client_secret,
            &config.google_redirect_uri,
        )
    }

    /// Authorization URL with a fresh CSRF state and PKCE challenge.
    pub fn login_redirect(&self) -> LoginRedirect {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .set_redirect_uri(std::borrow::Cow::Borrowed(&self.redirect_uri))
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        LoginRedirect {
            url: auth_url.to_string(),
            csrf_state: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    /// Exchanges the authorization code for tokens and fetches the user's profile.
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: String,
    ) -> Result<GoogleUserInfo, AppError> {
        let http_client = oauth2::reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| oauth_failure("Failed to build HTTP client", e))?;

        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_redirect_uri(std::borrow::Cow::Borrowed(&self.redirect_uri))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&http_client)
            .await
            .map_err(|e| oauth_failure("Token exchange failed", e))?;

        let access_token = token_result.access_token().secret();

        self.http_client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| oauth_failure("Failed to fetch user info", e))?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| oauth_failure("Failed to parse user info", e))
    }
}

fn oauth_failure(context: &str, err: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %err, "{}", context);
    AppError::Internal(format!("{context}: {err}"))
}
