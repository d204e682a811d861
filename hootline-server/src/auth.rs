//! Bearer-token verification.
//!
//! Tokens are HS256 JWTs minted elsewhere; this service only verifies them.
//! The middleware checks the signature and expiry, then resolves the token's
//! subject against the user store. A token whose subject no longer exists is
//! rejected, so every downstream handler can rely on [`Principal`] naming a
//! live user row.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use hootline_core::User;

use crate::db::StoreError;
use crate::state::AppState;

/// Claims carried by an access token.
///
/// `sub` is the user id as a string; the shape is shared with the identity
/// service that mints the tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verifies token signatures and expiry.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode and validate a token, returning its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))
    }
}

/// The authenticated caller, resolved to a full user record.
///
/// Inserted into request extensions by [`require_principal`]; handlers take
/// it with `Extension<Principal>`.
#[derive(Debug, Clone)]
pub struct Principal(pub User);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token subject is not a known user")]
    UnknownPrincipal,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::UnknownPrincipal => {
                (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string())
            }
            AuthError::Store(err) => {
                tracing::error!(error = %err, "store failure during auth");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));
        (status, body).into_response()
    }
}

/// Middleware guarding the hoot routes.
///
/// On success the request proceeds with a [`Principal`] extension; any
/// failure short-circuits with a 401 (or 500 for store trouble).
pub async fn require_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let claims = state.verifier().decode(token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

    let user = state
        .users()
        .get(user_id)
        .await?
        .ok_or(AuthError::UnknownPrincipal)?;

    tracing::debug!(user_id = %user.id, username = %user.username, "authenticated");
    request.extensions_mut().insert(Principal(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_for(sub: &str, exp: i64) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "kestrel".to_string(),
            iat: Utc::now().timestamp(),
            exp,
        }
    }

    #[test]
    fn roundtrip() {
        let verifier = TokenVerifier::new("secret");
        let id = Uuid::new_v4().to_string();
        let token = mint("secret", &claims_for(&id, Utc::now().timestamp() + 3600));

        let claims = verifier.decode(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "kestrel");
    }

    #[test]
    fn wrong_secret_rejected() {
        let verifier = TokenVerifier::new("secret");
        let token = mint(
            "other-secret",
            &claims_for("x", Utc::now().timestamp() + 3600),
        );

        assert!(matches!(
            verifier.decode(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let verifier = TokenVerifier::new("secret");
        // well past the default leeway
        let token = mint("secret", &claims_for("x", Utc::now().timestamp() - 7200));

        assert!(matches!(
            verifier.decode(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn garbage_rejected() {
        let verifier = TokenVerifier::new("secret");
        assert!(verifier.decode("not-a-jwt").is_err());
    }
}
