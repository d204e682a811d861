//! HTTP service for hoots: short posts with titles, bodies, and categories.
//!
//! A hoot belongs to the user who created it. Reads are open to any
//! authenticated caller; writes are restricted to the author, enforced in a
//! single conditional statement at the store so a check can never go stale.
//!
//! The crate splits into:
//! - [`auth`]: bearer-token verification middleware and the request principal
//! - [`db`]: store traits plus the Postgres and in-memory backends
//! - [`http`]: router, handlers, and the error-to-response mapping

pub mod auth;
pub mod db;
pub mod http;
pub mod state;

pub use http::server::serve;
pub use state::AppState;
