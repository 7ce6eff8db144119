use crate::domain::email::normalize_email;
use crate::domain::entities::VerifiedIdentity;
use crate::domain::errors::IdentityError;
use crate::domain::ports::IdentityVerifier;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;

pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

// Subset of the OpenID userinfo claims this service reads.
#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
}

#[derive(Debug)]
pub enum UserInfoClientError {
    Transport(reqwest::Error),
    Upstream { status: StatusCode },
    Decode(reqwest::Error),
}

impl fmt::Display for UserInfoClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserInfoClientError::Transport(err) => write!(f, "userinfo transport error: {err}"),
            UserInfoClientError::Upstream { status } => {
                write!(f, "userinfo upstream error {status}")
            }
            UserInfoClientError::Decode(err) => write!(f, "userinfo response decode error: {err}"),
        }
    }
}

impl std::error::Error for UserInfoClientError {}

// Thin reqwest client for the identity provider's userinfo endpoint.
#[derive(Clone)]
pub struct GoogleUserInfoClient {
    http: Client,
    userinfo_url: String,
}

impl GoogleUserInfoClient {
    pub fn new(http: Client, userinfo_url: impl Into<String>) -> Self {
        Self {
            http,
            userinfo_url: userinfo_url.into(),
        }
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, UserInfoClientError> {
        let res = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(UserInfoClientError::Transport)?;
        let status = res.status();

        if !status.is_success() {
            return Err(UserInfoClientError::Upstream { status });
        }

        res.json::<UserInfo>()
            .await
            .map_err(UserInfoClientError::Decode)
    }
}

#[async_trait]
impl IdentityVerifier for GoogleUserInfoClient {
    async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let info = self
            .fetch_userinfo(access_token)
            .await
            .map_err(|err| match err {
                // Any non-success answer means the token is not usable.
                UserInfoClientError::Upstream { status } => {
                    tracing::warn!(%status, "identity provider rejected access token");
                    IdentityError::Rejected
                }
                other => IdentityError::Unavailable(other.to_string()),
            })?;

        Ok(VerifiedIdentity {
            email: normalize_email(info.email.as_deref().unwrap_or_default()),
            display_name: info.name.unwrap_or_default(),
        })
    }
}
