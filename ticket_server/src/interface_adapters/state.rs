use std::sync::Arc;

use crate::domain::email::AllowedDomain;
use crate::domain::ports::{IdentityVerifier, StudentStore};

// Application state shared by every request; nothing in here is mutable.
#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub verifier: Arc<dyn IdentityVerifier>,
    pub store: Arc<dyn StudentStore>,
    pub allowed_domain: Arc<AllowedDomain>,
}
