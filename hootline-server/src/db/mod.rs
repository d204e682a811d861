//! Store layer for hoots and users.
//!
//! Handlers talk to the [`HootStore`] and [`UserStore`] traits; the concrete
//! backend is picked at startup. Postgres is the real one, the in-memory
//! store exists so router tests run without a database.
//!
//! Missing rows and ownership refusals are ordinary outcomes here, not
//! errors: reads return `Option`, guarded writes return [`OwnedWrite`].
//! [`StoreError`] is reserved for backend failure.

pub mod memory;
pub mod migrations;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use hootline_core::config::DatabaseConfig;
use hootline_core::{Hoot, HootDraft, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Backend failure surfaced to the HTTP layer as a 500.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// A hoot with its author reference resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HootWithAuthor {
    pub hoot: Hoot,
    pub author: User,
}

/// Outcome of an ownership-guarded write.
///
/// The guard and the write are one atomic step inside the store, so
/// `Applied` means the caller owned the row at the moment it changed.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedWrite {
    /// The write went through; carries the resulting record (for updates)
    /// or the removed record (for deletes).
    Applied(Hoot),
    /// No hoot with that id.
    Missing,
    /// The hoot exists but belongs to someone else. Nothing was written.
    NotOwner,
}

#[async_trait]
pub trait HootStore: Send + Sync {
    /// Persist a new hoot owned by `author_id`; the store assigns id and
    /// timestamps.
    async fn create(&self, author_id: Uuid, draft: HootDraft) -> Result<Hoot, StoreError>;

    /// Every hoot, newest first, with authors resolved.
    async fn list(&self) -> Result<Vec<HootWithAuthor>, StoreError>;

    /// One hoot by id, with its author resolved.
    async fn find(&self, id: Uuid) -> Result<Option<HootWithAuthor>, StoreError>;

    /// Replace the content fields of a hoot, but only if `author_id` owns it.
    /// Absent draft fields overwrite with null; id, author, and creation time
    /// never change.
    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        draft: HootDraft,
    ) -> Result<OwnedWrite, StoreError>;

    /// Remove a hoot, but only if `author_id` owns it. `Applied` carries the
    /// record as it was before removal.
    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<OwnedWrite, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id.
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a user record. Token minting lives elsewhere; this is the
    /// provisioning seam used by tests and tooling.
    async fn insert(&self, username: &str) -> Result<User, StoreError>;
}

/// Open a Postgres pool against the configured database.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;
    tracing::debug!(max_connections = config.max_connections, "connected to Postgres");
    Ok(pool)
}
