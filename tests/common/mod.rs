//! Common test utilities

use chain_indexer::filter::Table;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

/// Tests in one binary share a database; each holds this while it runs
static DB_LOCK: Mutex<()> = Mutex::const_new(());

pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

/// Setup test database - migrate and truncate every indexer table
pub async fn setup_test_db() -> TestDb {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let guard = DB_LOCK.lock().await;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    chain_indexer::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let tables: Vec<&str> = Table::ALL.iter().map(|t| t.name()).collect();
    sqlx::query(&format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        tables.join(", ")
    ))
    .execute(&pool)
    .await
    .expect("Failed to clean up DB");

    TestDb {
        pool,
        _guard: guard,
    }
}

/// Count rows of `table`
#[allow(dead_code)]
pub async fn count(pool: &PgPool, table: Table) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.name()))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
