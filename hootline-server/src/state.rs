//! Shared application state.

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::db::{HootStore, UserStore};

/// Everything the handlers and middleware need, behind one cheap clone.
///
/// Stores are trait objects so the HTTP layer runs identically over Postgres
/// and over the in-memory backend used in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    hoots: Arc<dyn HootStore>,
    users: Arc<dyn UserStore>,
    verifier: TokenVerifier,
}

impl AppState {
    pub fn new(
        hoots: Arc<dyn HootStore>,
        users: Arc<dyn UserStore>,
        verifier: TokenVerifier,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                hoots,
                users,
                verifier,
            }),
        }
    }

    pub fn hoots(&self) -> &dyn HootStore {
        self.inner.hoots.as_ref()
    }

    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.inner.verifier
    }
}
