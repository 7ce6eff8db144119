use crate::domain::entities::StudentRecord;
use crate::domain::ports::StudentStore;
use crate::interface_adapters::stores::{TableName, single_row};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

// PostgreSQL-backed student store for deployments that bypass the REST gateway.
#[derive(Clone)]
pub struct PostgresStudentStore {
    db: PgPool,
    query: String,
}

impl PostgresStudentStore {
    pub fn new(db: PgPool, table: &TableName) -> Self {
        Self {
            db,
            query: lookup_query(table),
        }
    }
}

// Rows come back as one jsonb object so any column set passes through unchanged.
fn lookup_query(table: &TableName) -> String {
    format!(r#"SELECT to_jsonb(t) AS record FROM "{table}" t WHERE t.email = $1 LIMIT 2"#)
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, String> {
        let rows: Vec<(Value,)> = sqlx::query_as(&self.query)
            .bind(email)
            .fetch_all(&self.db)
            .await
            .map_err(|err| format!("student query failed: {err}"))?;

        let records = decode_rows(rows.into_iter().map(|(record,)| record))?;
        Ok(single_row(records))
    }
}

fn decode_rows(rows: impl IntoIterator<Item = Value>) -> Result<Vec<StudentRecord>, String> {
    rows.into_iter()
        .map(|record| match record {
            Value::Object(fields) => Ok(StudentRecord(fields)),
            other => Err(format!("student row is not an object: {other}")),
        })
        .collect()
}
