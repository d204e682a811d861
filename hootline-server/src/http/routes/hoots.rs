//! The hoots resource.
//!
//! All five routes sit behind [`crate::auth::require_principal`], layered in
//! `http::server`, so every handler here can count on a [`Principal`]
//! extension. Authorship is never taken from the request body: creates stamp
//! the principal as author, and the guarded writes pass the principal's id
//! straight into the store's conditional statement.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hootline_core::{Hoot, HootDraft, User};

use crate::auth::Principal;
use crate::db::{HootWithAuthor, OwnedWrite};
use crate::http::error::ApiError;
use crate::state::AppState;

/// Request body for create and update. All fields optional; unknown fields
/// (an attempted `author`, say) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct HootPayload {
    pub title: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
}

impl From<HootPayload> for HootDraft {
    fn from(payload: HootPayload) -> Self {
        HootDraft::new(payload.title, payload.text, payload.category)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthorResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HootResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
    pub author: AuthorResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl HootResponse {
    fn new(hoot: Hoot, author: User) -> Self {
        Self {
            id: hoot.id,
            title: hoot.title,
            text: hoot.text,
            category: hoot.category,
            author: author.into(),
            created_at: hoot.created_at.to_rfc3339(),
            updated_at: hoot.updated_at.to_rfc3339(),
        }
    }
}

impl From<HootWithAuthor> for HootResponse {
    fn from(entry: HootWithAuthor) -> Self {
        Self::new(entry.hoot, entry.author)
    }
}

/// POST /hoots
async fn create_hoot(
    State(state): State<AppState>,
    Extension(Principal(author)): Extension<Principal>,
    Json(payload): Json<HootPayload>,
) -> Result<(StatusCode, Json<HootResponse>), ApiError> {
    let hoot = state.hoots().create(author.id, payload.into()).await?;
    tracing::info!(hoot_id = %hoot.id, author = %author.username, "hoot created");
    Ok((StatusCode::CREATED, Json(HootResponse::new(hoot, author))))
}

/// GET /hoots
async fn list_hoots(State(state): State<AppState>) -> Result<Json<Vec<HootResponse>>, ApiError> {
    let hoots = state.hoots().list().await?;
    Ok(Json(hoots.into_iter().map(HootResponse::from).collect()))
}

/// GET /hoots/{id}
async fn get_hoot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HootResponse>, ApiError> {
    let found = state
        .hoots()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("hoot", id))?;
    Ok(Json(found.into()))
}

/// PUT /hoots/{id}
///
/// Full-document replace of the content fields. 403 if the hoot belongs to
/// someone else, 404 if it does not exist.
async fn update_hoot(
    State(state): State<AppState>,
    Extension(Principal(author)): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HootPayload>,
) -> Result<Json<HootResponse>, ApiError> {
    match state
        .hoots()
        .update_owned(id, author.id, payload.into())
        .await?
    {
        OwnedWrite::Applied(hoot) => {
            tracing::info!(hoot_id = %hoot.id, author = %author.username, "hoot updated");
            Ok(Json(HootResponse::new(hoot, author)))
        }
        OwnedWrite::Missing => Err(ApiError::not_found("hoot", id)),
        OwnedWrite::NotOwner => Err(ApiError::Forbidden),
    }
}

/// DELETE /hoots/{id}
///
/// Responds with the record as it was just before removal.
async fn delete_hoot(
    State(state): State<AppState>,
    Extension(Principal(author)): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<HootResponse>, ApiError> {
    match state.hoots().delete_owned(id, author.id).await? {
        OwnedWrite::Applied(hoot) => {
            tracing::info!(hoot_id = %hoot.id, author = %author.username, "hoot deleted");
            Ok(Json(HootResponse::new(hoot, author)))
        }
        OwnedWrite::Missing => Err(ApiError::not_found("hoot", id)),
        OwnedWrite::NotOwner => Err(ApiError::Forbidden),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hoots", get(list_hoots).post(create_hoot))
        .route(
            "/hoots/{id}",
            get(get_hoot).put(update_hoot).delete(delete_hoot),
        )
}
