// Fake upstreams and server bootstrap shared by the integration tests.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ticket_server::Config;
use ticket_server::frameworks::config::FileConfig;
use tokio::net::TcpListener;

pub const GOOD_TOKEN: &str = "good-token";
pub const OUTSIDER_TOKEN: &str = "outsider-token";
pub const SERVICE_KEY: &str = "test-service-role-key";

// Bind an ephemeral port and serve the router on the current runtime.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake upstream failed");
    });
    format!("http://{addr}")
}

// Userinfo endpoint that knows two tokens and rejects everything else.
pub async fn spawn_fake_google() -> String {
    async fn userinfo(headers: HeaderMap) -> Response {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match bearer {
            Some(GOOD_TOKEN) => Json(json!({
                "sub": "1234",
                "email": "Jane.Doe@GOA.BITS-PILANI.AC.IN",
                "email_verified": true,
                "name": "Jane Doe"
            }))
            .into_response(),
            Some(OUTSIDER_TOKEN) => Json(json!({
                "sub": "5678",
                "email": "student@otherdomain.edu",
                "name": "Outsider"
            }))
            .into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid_token" })),
            )
                .into_response(),
        }
    }

    let base = spawn(Router::new().route("/oauth2/v3/userinfo", get(userinfo))).await;
    format!("{base}/oauth2/v3/userinfo")
}

#[derive(Clone, Debug)]
pub struct RecordedQuery {
    pub params: HashMap<String, String>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
}

// PostgREST stand-in serving a single `students` table.
#[derive(Clone, Default)]
pub struct FakePostgrest {
    rows: Arc<Mutex<Vec<Value>>>,
    queries: Arc<Mutex<Vec<RecordedQuery>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakePostgrest {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        let fake = Self::default();
        *fake.rows.lock().expect("rows mutex poisoned") = rows;
        fake
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        *fake.failing.lock().expect("failing mutex poisoned") = true;
        fake
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().expect("queries mutex poisoned").clone()
    }

    pub async fn spawn(&self) -> String {
        async fn students(
            State(fake): State<FakePostgrest>,
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> Response {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            };
            fake.queries
                .lock()
                .expect("queries mutex poisoned")
                .push(RecordedQuery {
                    params: params.clone(),
                    apikey: header("apikey"),
                    authorization: header("authorization"),
                });

            if *fake.failing.lock().expect("failing mutex poisoned") {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "code": "PGRST000", "message": "database unavailable" })),
                )
                    .into_response();
            }

            let wanted = params
                .get("email")
                .and_then(|filter| filter.strip_prefix("eq."))
                .unwrap_or_default()
                .to_string();
            let rows: Vec<Value> = fake
                .rows
                .lock()
                .expect("rows mutex poisoned")
                .iter()
                .filter(|row| row["email"] == wanted.as_str())
                .cloned()
                .collect();

            Json(rows).into_response()
        }

        spawn(
            Router::new()
                .route("/rest/v1/students", get(students))
                .with_state(self.clone()),
        )
        .await
    }
}

pub fn test_config(userinfo_url: &str, supabase_url: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("TICKET_SERVER_HOST", "127.0.0.1".to_string()),
        ("GOOGLE_USERINFO_URL", userinfo_url.to_string()),
        ("SUPABASE_URL", supabase_url.to_string()),
        ("SUPABASE_SERVICE_ROLE_KEY", SERVICE_KEY.to_string()),
    ]);
    Config::resolve(FileConfig::default(), |key| vars.get(key).cloned())
        .expect("expected test config to resolve")
}

// Start the ticket server against the given upstreams and return its base URL.
pub async fn spawn_ticket_server(config: Config) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        ticket_server::run(listener, config)
            .await
            .expect("server failed");
    });
    format!("http://{addr}")
}
