//! Auth client: the single point of entry for calls to the hosted auth service.
//!
//! Speaks the GoTrue-style REST API: `/signup`, `/token?grant_type=password`,
//! `/user` and the `/authorize` OAuth redirect. No retries: a failed call is
//! returned to the handler with the provider's message intact.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserRole;

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid auth service URL: {0}")]
    InvalidUrl(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected { status, .. } if status == StatusCode::UNAUTHORIZED.as_u16() => {
                AppError::Unauthorized
            }
            AuthError::Rejected { message, .. } => AppError::Auth(message),
            other => AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    LinkedIn,
}

impl OAuthProvider {
    /// Provider name as the auth service expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::LinkedIn => "linkedin_oidc",
        }
    }
}

/// User as reported by the auth service, flattened from its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// Account is active and signed in.
    SignedIn(AuthUser),
    /// The provider requires email confirmation before a session is issued.
    ConfirmationRequired(AuthUser),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<SignUpOutcome, AuthError>;

    /// Returns the provider access token and the user.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(String, AuthUser), AuthError>;

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    /// URL the browser is sent to for an OAuth sign-in.
    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, AuthError>;
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct SignUpMetadata<'a> {
    name: &'a str,
    user_role: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: RemoteMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteMetadata {
    name: Option<String>,
    full_name: Option<String>,
    user_role: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(SessionResponse),
    User(RemoteUser),
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
    error: Option<String>,
}

impl From<RemoteUser> for AuthUser {
    fn from(user: RemoteUser) -> Self {
        let meta = user.user_metadata;
        AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
            name: meta.name.or(meta.full_name),
            role: meta.user_role.as_deref().and_then(|r| r.parse().ok()),
            avatar_url: meta.avatar_url,
        }
    }
}

/// Extracts the provider's own message from an error body, falling back to the raw body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<RemoteError>(body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .unwrap_or_else(|| body.to_string())
}

/// HTTP client for the hosted auth service.
#[derive(Clone)]
pub struct HostedAuthClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HostedAuthClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AuthProvider for HostedAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&SignUpRequest {
                email,
                password,
                data: SignUpMetadata {
                    name,
                    user_role: role.as_str(),
                },
            })
            .send()
            .await?;

        let outcome = match Self::read::<SignUpResponse>(response).await? {
            SignUpResponse::Session(session) => SignUpOutcome::SignedIn(session.user.into()),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationRequired(user.into()),
        };
        debug!("Sign-up accepted for {email}");
        Ok(outcome)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(String, AuthUser), AuthError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let session: SessionResponse = Self::read(response).await?;
        Ok((session.access_token, session.user.into()))
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let user: RemoteUser = Self::read(response).await?;
        Ok(user.into())
    }

    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.endpoint("authorize"))
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);
        Ok(url.to_string())
    }
}
