// Framework bootstrap for the ticket lookup service.

use crate::domain::ports::{IdentityVerifier, StudentStore};
use crate::frameworks::config::{Config, RecordStoreConfig};
use crate::frameworks::db;
use crate::interface_adapters::clients::GoogleUserInfoClient;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::stores::{PostgresStudentStore, SupabaseStudentStore};
use std::{io::Result, sync::Arc};

// Default filter when RUST_LOG is unset; sqlx logs every statement at info.
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

fn init_runtime() {
    // Store credentials usually come from a local .env during development.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => subscriber.json().with_current_span(true).init(),
        _ => subscriber.compact().init(),
    }

    // Handler panics are turned into 500s by the router; this keeps their backtrace.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: Config) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(config).await?;
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;
    let address = config.bind_addr;

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, config).await
}

async fn build_state(config: Config) -> Result<AppState> {
    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| std::io::Error::other(format!("failed to initialize http client: {e}")))?;

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(GoogleUserInfoClient::new(
        http.clone(),
        config.google_userinfo_url.as_str(),
    ));
    tracing::debug!(userinfo_url = %config.google_userinfo_url, "identity client configured");

    let store: Arc<dyn StudentStore> = match &config.record_store {
        RecordStoreConfig::Supabase {
            project_url,
            service_role_key,
            table,
        } => {
            let store = SupabaseStudentStore::new(http, project_url, service_role_key.as_str(), table)
                .map_err(|e| std::io::Error::other(format!("invalid record store url: {e}")))?;
            tracing::debug!(%project_url, %table, "supabase record store configured");
            Arc::new(store)
        }
        RecordStoreConfig::Postgres {
            database_url,
            table,
        } => {
            let pool = db::connect_pool(database_url).await.map_err(|e| {
                tracing::error!(error = %e, "failed to connect to database");
                std::io::Error::other(e)
            })?;
            tracing::debug!(%table, "postgres record store configured");
            Arc::new(PostgresStudentStore::new(pool, table))
        }
    };

    tracing::info!(
        allowed_domain = config.allowed_domain.as_str(),
        "ticket lookup configured"
    );

    Ok(AppState {
        verifier,
        store,
        allowed_domain: Arc::new(config.allowed_domain),
    })
}
