use std::sync::Arc;
use tracing::{info, warn};

use super::parser::{merge_unique, parse_ingredients};
use super::profile::load_profile_facts;
use super::{
    IngredientCatalog, ProfileSource, SearchBackend, SearchCriteria, SearchError, SearchResponse,
    UserId,
};

pub const DEFAULT_SERVINGS: u32 = 4;

/// Request-level inputs of a search, as read from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub use_fridge: bool,
    pub ingredients_form: String,
    pub servings: Option<u32>,
}

/// Single entry point for recipe searches.
pub struct RecipeSearchService {
    profiles: Arc<dyn ProfileSource>,
    catalog: Arc<dyn IngredientCatalog>,
    backend: Arc<dyn SearchBackend>,
}

impl RecipeSearchService {
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        catalog: Arc<dyn IngredientCatalog>,
        backend: Arc<dyn SearchBackend>,
    ) -> Self {
        Self {
            profiles,
            catalog,
            backend,
        }
    }

    /// Runs one search for `user_id`.
    ///
    /// An empty result means nothing matched; a failed search is always an
    /// `Err`.
    pub async fn search(
        &self,
        user_id: Option<UserId>,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let user_id = user_id.ok_or(SearchError::Unauthenticated)?;

        let profile = load_profile_facts(self.profiles.as_ref(), user_id).await?;

        let frigo_ingredients = profile.fridge_contribution(request.use_fridge);
        if request.use_fridge && !profile.has_fridge() {
            warn!(user_id = %user_id, "Fridge requested but the user has none.");
        }
        let form_ingredients =
            parse_ingredients(self.catalog.as_ref(), &request.ingredients_form).await?;
        let all_ingredients =
            merge_unique([frigo_ingredients.as_slice(), form_ingredients.as_slice()]);

        let criteria = SearchCriteria {
            blacklist_ids: profile.blacklist_ids,
            diet_ids: profile.diet_ids,
            frigo_ingredients,
            form_ingredients,
            all_ingredients,
            servings: request.servings.unwrap_or(DEFAULT_SERVINGS),
        };

        let recipes = self.backend.search(user_id, &criteria).await?;
        info!(
            user_id = %user_id,
            available = criteria.all_ingredients.len(),
            results = recipes.len(),
            "Recipe search completed."
        );

        Ok(SearchResponse {
            total_results: recipes.len(),
            recipes,
            search_criteria: criteria,
        })
    }
}
