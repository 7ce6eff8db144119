// Record store adapters behind the StudentStore port.

pub mod postgres;
pub mod supabase;

pub use postgres::PostgresStudentStore;
pub use supabase::{StoreClientError, SupabaseStudentStore};

use crate::domain::entities::StudentRecord;
use std::fmt;

pub const DEFAULT_STUDENTS_TABLE: &str = "students";

// Table name that is safe to place in a REST path or an SQL statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    // Postgres truncates identifiers past this length.
    const MAX_LEN: usize = 63;

    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if value.len() > Self::MAX_LEN || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_STUDENTS_TABLE.to_string())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Single-row semantics: anything other than exactly one match is "not found".
pub(crate) fn single_row(mut rows: Vec<StudentRecord>) -> Option<StudentRecord> {
    match rows.len() {
        0 => None,
        1 => rows.pop(),
        count => {
            tracing::warn!(count, "several student rows share one email, treating as not found");
            None
        }
    }
}
