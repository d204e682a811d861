//! hootline-core: domain records and configuration for the hoots service
//!
//! Keeps the parts shared between the server and its tests free of HTTP and
//! SQL concerns: the `Hoot`/`User` records, the draft type used for writes,
//! and the layered TOML + environment configuration.

pub mod config;
pub mod error;
pub mod model;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use model::{Hoot, HootDraft, User};
