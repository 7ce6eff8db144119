// Domain-level errors for the ticket lookup pipeline.
#[derive(Debug)]
pub enum LookupError {
    MissingToken,
    InvalidToken,
    DomainNotAllowed,
    IdentityUnavailable,
    StorageFailure,
}

// Errors surfaced by an identity verifier.
#[derive(Debug)]
pub enum IdentityError {
    // The provider answered but refused the token.
    Rejected,
    // The provider could not be reached or answered with garbage.
    Unavailable(String),
}
