use crate::domain::entities::StudentRecord;
use crate::domain::ports::StudentStore;
use crate::interface_adapters::stores::{TableName, single_row};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::fmt;
use url::Url;

// PostgREST error body; only the message is kept for logs.
#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    message: String,
}

#[derive(Debug)]
pub enum StoreClientError {
    Transport(reqwest::Error),
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    Decode(reqwest::Error),
}

impl fmt::Display for StoreClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreClientError::Transport(err) => write!(f, "record store transport error: {err}"),
            StoreClientError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "record store upstream error {status}: {message}")
                } else {
                    write!(f, "record store upstream error {status}")
                }
            }
            StoreClientError::Decode(err) => write!(f, "record store decode error: {err}"),
        }
    }
}

impl std::error::Error for StoreClientError {}

// Reads student rows through Supabase's REST interface with the service role key.
#[derive(Clone)]
pub struct SupabaseStudentStore {
    http: Client,
    rows_url: Url,
    service_role_key: String,
}

impl SupabaseStudentStore {
    pub fn new(
        http: Client,
        project_url: &Url,
        service_role_key: impl Into<String>,
        table: &TableName,
    ) -> Result<Self, url::ParseError> {
        // Join relative to the project root even when it carries a path prefix.
        let mut base = project_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rows_url = base.join(&format!("rest/v1/{table}"))?;

        Ok(Self {
            http,
            rows_url,
            service_role_key: service_role_key.into(),
        })
    }

    fn lookup_url(&self, email: &str) -> Url {
        let mut url = self.rows_url.clone();
        // Two rows are enough to tell "exactly one" from "ambiguous".
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("email", &format!("eq.{email}"))
            .append_pair("limit", "2");
        url
    }

    async fn fetch_rows(&self, email: &str) -> Result<Vec<StudentRecord>, StoreClientError> {
        let res = self
            .http
            .get(self.lookup_url(email))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(StoreClientError::Transport)?;
        let status = res.status();

        if !status.is_success() {
            let message = res
                .json::<PostgrestErrorResponse>()
                .await
                .ok()
                .map(|payload| payload.message);
            return Err(StoreClientError::Upstream { status, message });
        }

        res.json::<Vec<StudentRecord>>()
            .await
            .map_err(StoreClientError::Decode)
    }
}

#[async_trait]
impl StudentStore for SupabaseStudentStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, String> {
        let rows = self.fetch_rows(email).await.map_err(|err| err.to_string())?;
        Ok(single_row(rows))
    }
}
