use sqlx::{PgPool, postgres::PgPoolOptions};

// Each request holds at most one connection, for a single keyed read.
const STUDENT_POOL_MAX_CONNECTIONS: u32 = 8;

// Connect the pool backing the direct Postgres student store.
pub async fn connect_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(STUDENT_POOL_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}
