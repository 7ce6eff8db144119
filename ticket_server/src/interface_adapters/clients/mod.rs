// The clients defined here are reqwest clients for external services.

pub mod google;

pub use google::{GOOGLE_USERINFO_URL, GoogleUserInfoClient, UserInfoClientError};
