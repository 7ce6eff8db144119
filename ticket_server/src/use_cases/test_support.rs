use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{StudentRecord, VerifiedIdentity};
use crate::domain::errors::IdentityError;
use crate::domain::ports::{IdentityVerifier, StudentStore};

pub(crate) type RecordTable = Arc<Mutex<HashMap<String, StudentRecord>>>;

pub(crate) fn record(value: Value) -> StudentRecord {
    match value {
        Value::Object(fields) => StudentRecord(fields),
        other => panic!("expected a json object, got {other}"),
    }
}

#[derive(Clone)]
enum VerifierOutcome {
    Accept { email: String, name: String },
    Reject,
    Unavailable,
}

// Identity verifier fake that counts how often it was consulted.
#[derive(Clone)]
pub(crate) struct FakeVerifier {
    outcome: VerifierOutcome,
    calls: Arc<AtomicUsize>,
}

impl FakeVerifier {
    fn with_outcome(outcome: VerifierOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    // Returns the email untouched so callers are responsible for normalizing.
    pub(crate) fn accepting(email: &str, name: &str) -> Self {
        Self::with_outcome(VerifierOutcome::Accept {
            email: email.to_string(),
            name: name.to_string(),
        })
    }

    pub(crate) fn rejecting() -> Self {
        Self::with_outcome(VerifierOutcome::Reject)
    }

    pub(crate) fn unavailable() -> Self {
        Self::with_outcome(VerifierOutcome::Unavailable)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, _access_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            VerifierOutcome::Accept { email, name } => Ok(VerifiedIdentity {
                email: email.clone(),
                display_name: name.clone(),
            }),
            VerifierOutcome::Reject => Err(IdentityError::Rejected),
            VerifierOutcome::Unavailable => {
                Err(IdentityError::Unavailable("connection refused".to_string()))
            }
        }
    }
}

// In-memory student store that records every email it was asked for.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    records: RecordTable,
    lookups: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn insert_test_record(&self, email: impl Into<String>, record: StudentRecord) {
        let mut guard = self.records.lock().expect("records mutex poisoned");
        guard.insert(email.into(), record);
    }

    pub(crate) fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookups mutex poisoned").clone()
    }
}

#[async_trait]
impl StudentStore for RecordingStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, String> {
        self.lookups
            .lock()
            .expect("lookups mutex poisoned")
            .push(email.to_string());

        if self.fail {
            return Err("query failed".to_string());
        }

        let guard = self.records.lock().expect("records mutex poisoned");
        Ok(guard.get(email).cloned())
    }
}
