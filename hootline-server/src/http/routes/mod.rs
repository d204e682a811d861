//! One module per resource, each exposing a `router()`.

pub mod health;
pub mod hoots;
