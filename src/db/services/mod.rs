//! The `services` module holds every query the backend runs against the
//! database. Callers work with entity models and never build SQL themselves.
//!
//! Sub-modules are split by domain area; their public items are re-exported
//! here so they can be reached as `crate::db::services::*`.

pub mod ingredient_service;
pub mod profile_service;
pub mod recipe_service;

pub use ingredient_service::*;
pub use profile_service::*;
pub use recipe_service::*;
