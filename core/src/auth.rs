//! Sign-in against the hosted auth service.
//!
//! Email/password sign-in and sign-up go over the GoTrue REST API;
//! OAuth only produces the provider URL the user must open.
//! Tokens are never refreshed.

use crate::{
    config::{AuthConfig, Credentials},
    error::{DashError, DashResult},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: String,
}

/// Result of a sign-up. Projects with email confirmation return no session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

pub trait AuthProvider: Send {
    fn sign_in_with_password(&self, email: &str, password: &str) -> DashResult<AuthSession>;
    fn sign_up(&self, email: &str, password: &str) -> DashResult<SignUpOutcome>;
    fn oauth_url(&self, provider: &str) -> DashResult<String>;
}

/// Both fields are required before any call goes out.
pub fn validate_credentials(email: &str, password: &str) -> DashResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(DashError::InvalidInput(
            "Please enter both email and password.".into(),
        ));
    }
    Ok(())
}

pub struct SupabaseAuth {
    http: reqwest::blocking::Client,
    base_url: String,
    anon_key: String,
    redirect_to: Option<String>,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    // Some project settings return the bare user object.
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: &str, config: &AuthConfig) -> DashResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            redirect_to: config.oauth_redirect_to.clone(),
        })
    }

    /// Build from environment credentials; fails when either is absent.
    pub fn from_credentials(creds: &Credentials, config: &AuthConfig) -> DashResult<Self> {
        Self::new(creds.supabase_url()?, creds.supabase_anon_key()?, config)
    }

    fn post(&self, path: &str, body: &PasswordBody<'_>) -> DashResult<reqwest::blocking::Response> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(body)
            .send()?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| status.to_string());
        Err(DashError::Auth(message))
    }
}

impl AuthProvider for SupabaseAuth {
    fn sign_in_with_password(&self, email: &str, password: &str) -> DashResult<AuthSession> {
        validate_credentials(email, password)?;
        let response = self.post(
            "/auth/v1/token?grant_type=password",
            &PasswordBody { email, password },
        )?;
        let token: TokenResponse = response.json()?;
        Ok(AuthSession {
            user: token.user,
            access_token: token.access_token,
        })
    }

    fn sign_up(&self, email: &str, password: &str) -> DashResult<SignUpOutcome> {
        validate_credentials(email, password)?;
        let response = self.post("/auth/v1/signup", &PasswordBody { email, password })?;
        let body: SignUpResponse = response.json()?;
        let user = body
            .user
            .or_else(|| body.id.map(|id| AuthUser { id, email: body.email }));
        let session = match (&user, body.access_token) {
            (Some(user), Some(access_token)) => Some(AuthSession {
                user: user.clone(),
                access_token,
            }),
            _ => None,
        };
        Ok(SignUpOutcome { user, session })
    }

    fn oauth_url(&self, provider: &str) -> DashResult<String> {
        let mut params = vec![("provider", provider.to_string())];
        if let Some(redirect) = &self.redirect_to {
            params.push(("redirect_to", redirect.clone()));
        }
        let url = reqwest::Url::parse_with_params(
            &format!("{}/auth/v1/authorize", self.base_url),
            &params,
        )
        .map_err(|e| DashError::Auth(format!("invalid auth URL: {e}")))?;
        Ok(url.to_string())
    }
}
