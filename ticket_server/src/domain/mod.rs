// Domain layer: identity, email policy and the ports the lookup depends on.

pub mod email;
pub mod entities;
pub mod errors;
pub mod ports;

pub use email::{AllowedDomain, normalize_email};
pub use entities::{StudentRecord, TicketLookup, VerifiedIdentity};
pub use errors::{IdentityError, LookupError};
pub use ports::{IdentityVerifier, StudentStore};
