use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{StudentRecord, VerifiedIdentity};
use crate::domain::errors::IdentityError;

// Port for exchanging an access token for the caller's identity claims.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

// Port for reading purchase records keyed by normalized email.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, String>;
}

#[async_trait]
impl<T: IdentityVerifier + ?Sized> IdentityVerifier for Arc<T> {
    async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        (**self).verify(access_token).await
    }
}

#[async_trait]
impl<T: StudentStore + ?Sized> StudentStore for Arc<T> {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, String> {
        (**self).find_by_email(email).await
    }
}
