//! Postgres-backed stores.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use hootline_core::{Hoot, HootDraft, User};

use super::{HootStore, HootWithAuthor, OwnedWrite, StoreError, UserStore};

/// Store implementation over a shared connection pool. Implements both
/// [`HootStore`] and [`UserStore`]; one instance serves the whole app.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn hoot_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM hoots WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<bool, _>(0))
    }

    /// Classify a guarded write that matched zero rows. The probe is
    /// diagnostic only; it never mutates.
    async fn classify_miss(&self, id: Uuid) -> Result<OwnedWrite, StoreError> {
        if self.hoot_exists(id).await? {
            Ok(OwnedWrite::NotOwner)
        } else {
            Ok(OwnedWrite::Missing)
        }
    }
}

fn hoot_from_row(row: &PgRow) -> Hoot {
    Hoot {
        id: row.get("id"),
        author_id: row.get("author_id"),
        title: row.get("title"),
        text: row.get("text"),
        category: row.get("category"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn joined_from_row(row: &PgRow) -> HootWithAuthor {
    let hoot = hoot_from_row(row);
    let author = User {
        id: hoot.author_id,
        username: row.get("author_username"),
        created_at: row.get("author_created_at"),
    };
    HootWithAuthor { hoot, author }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl HootStore for PgStore {
    async fn create(&self, author_id: Uuid, draft: HootDraft) -> Result<Hoot, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO hoots (author_id, title, text, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, title, text, category, created_at, updated_at
            "#,
        )
        .bind(author_id)
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(&draft.category)
        .fetch_one(&self.pool)
        .await?;
        Ok(hoot_from_row(&row))
    }

    async fn list(&self) -> Result<Vec<HootWithAuthor>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT h.id, h.author_id, h.title, h.text, h.category,
                   h.created_at, h.updated_at,
                   u.username AS author_username, u.created_at AS author_created_at
            FROM hoots h
            JOIN users u ON u.id = h.author_id
            ORDER BY h.created_at DESC, h.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(joined_from_row).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<HootWithAuthor>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT h.id, h.author_id, h.title, h.text, h.category,
                   h.created_at, h.updated_at,
                   u.username AS author_username, u.created_at AS author_created_at
            FROM hoots h
            JOIN users u ON u.id = h.author_id
            WHERE h.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(joined_from_row))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        draft: HootDraft,
    ) -> Result<OwnedWrite, StoreError> {
        // Ownership guard and write in one statement; zero rows means either
        // a missing hoot or someone else's.
        let row = sqlx::query(
            r#"
            UPDATE hoots
            SET title = $3, text = $4, category = $5, updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            RETURNING id, author_id, title, text, category, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(&draft.category)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(OwnedWrite::Applied(hoot_from_row(&row))),
            None => self.classify_miss(id).await,
        }
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<OwnedWrite, StoreError> {
        let row = sqlx::query(
            r#"
            DELETE FROM hoots
            WHERE id = $1 AND author_id = $2
            RETURNING id, author_id, title, text, category, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(OwnedWrite::Applied(hoot_from_row(&row))),
            None => self.classify_miss(id).await,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert(&self, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query(
            "INSERT INTO users (username) VALUES ($1) RETURNING id, username, created_at",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(user_from_row(&row))
    }
}
