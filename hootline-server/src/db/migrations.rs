//! Schema setup, run once at startup.
//!
//! Statements are idempotent (`IF NOT EXISTS`) so restarting against an
//! existing database is a no-op. `gen_random_uuid()` needs Postgres 13+.

use sqlx::PgPool;

use super::StoreError;

pub async fn run(pool: &PgPool) -> Result<(), StoreError> {
    create_users_table(pool).await?;
    create_hoots_table(pool).await?;
    create_indexes(pool).await?;
    tracing::info!("migrations complete");
    Ok(())
}

async fn create_users_table(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_hoots_table(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hoots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT,
            text TEXT,
            category TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_hoots_author ON hoots(author_id)")
        .execute(pool)
        .await?;
    // the feed sorts newest-first
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_hoots_created ON hoots(created_at DESC)")
        .execute(pool)
        .await?;
    Ok(())
}
