//! Domain records for the hoots service.
//!
//! These are plain store-shaped structs. Serialization lives at the HTTP
//! layer (request/response DTOs), not here; a hoot row never reaches the
//! wire without its author reference resolved first.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user. Provisioned by the external identity service; this
/// service only ever reads the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A user-authored post. `author_id` is set once at creation and never
/// changes; `created_at`/`updated_at` are store-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hoot {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable part of a hoot. Content fields are opaque to the service:
/// any combination, including none at all, is accepted. No author field:
/// authorship always comes from the authenticated principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HootDraft {
    pub title: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
}

impl HootDraft {
    pub fn new(
        title: Option<String>,
        text: Option<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            title,
            text,
            category,
        }
    }
}
