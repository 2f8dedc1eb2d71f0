//! Recipe search and matching.
//!
//! A search request flows through three steps: the user's profile facts are
//! loaded, the free-form ingredient parameter is parsed against the
//! ingredient catalog, and the configured [`SearchBackend`] selects and ranks
//! the public recipes. Storage is reached only through the read traits below,
//! so the whole pipeline can run against the database or in memory.

use async_trait::async_trait;
use thiserror::Error;

pub mod backend;
pub mod matcher;
pub mod models;
pub mod parser;
pub mod profile;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{LocalSearchBackend, RemoteSearchBackend, SearchBackend};
pub use models::*;
pub use profile::UserProfileFacts;
pub use service::{RecipeSearchService, SearchRequest};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Malformed ingredient input: {0}")]
    MalformedIngredientInput(String),
    #[error("Search could not be performed: {0}")]
    UpstreamSearchFailure(String),
    #[error("No profile for user {0}")]
    ProfileNotFound(i32),
}

impl From<sea_orm::DbErr> for SearchError {
    fn from(err: sea_orm::DbErr) -> Self {
        SearchError::UpstreamSearchFailure(format!("Database error: {err}"))
    }
}

/// Resolves ingredient ids to canonical catalog records.
#[async_trait]
pub trait IngredientCatalog: Send + Sync {
    /// Looks up all `ids` in one batch. Unknown ids are simply absent from the
    /// result; order follows the first occurrence of each id in `ids`.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<CatalogIngredient>, SearchError>;
}

/// Read access to the per-user facts a search depends on.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn load_profile(&self, user_id: UserId) -> Result<UserProfileFacts, SearchError>;
}

/// Read access to the recipe corpus.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Returns public recipes. Implementations may apply `filter` at the
    /// storage level; callers must not rely on it having been applied.
    async fn find_public_recipes(
        &self,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeRecord>, SearchError>;
}
