//! HTTP surface: router assembly, handlers, and error mapping.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, serve};
