use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Identity claims returned by the identity provider after a successful check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedIdentity {
    // Always normalized (trimmed and lowercased).
    pub email: String,
    pub display_name: String,
}

// Purchase row owned by the record store; fields are passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentRecord(pub Map<String, Value>);

impl StudentRecord {
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

// Outcome of a successful lookup: who the caller is and their record, if any.
#[derive(Clone, Debug)]
pub struct TicketLookup {
    pub identity: VerifiedIdentity,
    pub record: Option<StudentRecord>,
}
