use crate::domain::email::{AllowedDomain, normalize_email};
use crate::domain::entities::{TicketLookup, VerifiedIdentity};
use crate::domain::errors::{IdentityError, LookupError};
use crate::domain::ports::{IdentityVerifier, StudentStore};

// Ticket lookup use case with injected dependencies.
pub struct LookupTicketUseCase<'a, V, S> {
    pub verifier: V,
    pub store: S,
    pub allowed_domain: &'a AllowedDomain,
}

impl<V, S> LookupTicketUseCase<'_, V, S>
where
    V: IdentityVerifier,
    S: StudentStore,
{
    pub async fn execute(&self, access_token: Option<&str>) -> Result<TicketLookup, LookupError> {
        let access_token = validate_access_token(access_token)?;
        let identity = self.verify_identity(access_token).await?;
        self.enforce_domain(&identity)?;

        let record = self
            .store
            .find_by_email(&identity.email)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "student record lookup failed");
                LookupError::StorageFailure
            })?;

        Ok(TicketLookup { identity, record })
    }

    async fn verify_identity(&self, access_token: &str) -> Result<VerifiedIdentity, LookupError> {
        let identity = self
            .verifier
            .verify(access_token)
            .await
            .map_err(|err| match err {
                IdentityError::Rejected => LookupError::InvalidToken,
                IdentityError::Unavailable(reason) => {
                    tracing::error!(error = %reason, "identity provider unavailable");
                    LookupError::IdentityUnavailable
                }
            })?;

        // Adapters should already normalize, but the store key depends on it.
        Ok(VerifiedIdentity {
            email: normalize_email(&identity.email),
            display_name: identity.display_name,
        })
    }

    fn enforce_domain(&self, identity: &VerifiedIdentity) -> Result<(), LookupError> {
        if self.allowed_domain.permits(&identity.email) {
            return Ok(());
        }

        tracing::warn!(
            allowed_domain = self.allowed_domain.as_str(),
            "rejected email outside allowed domain"
        );
        Err(LookupError::DomainNotAllowed)
    }
}

fn validate_access_token(access_token: Option<&str>) -> Result<&str, LookupError> {
    match access_token {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(LookupError::MissingToken),
    }
}
