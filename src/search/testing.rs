//! In-memory collaborators for exercising the search pipeline in tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    CatalogIngredient, DietTag, IngredientCatalog, IngredientLink, ProfileSource, RecipeFilter,
    RecipeRecord, RecipeSource, SearchError, UserId, UserProfileFacts,
};

pub fn ts(minutes: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + minutes * 60, 0).unwrap()
}

pub fn recipe(
    id: i32,
    created_at: DateTime<Utc>,
    is_public: bool,
    ingredient_ids: &[i32],
    diet_ids: &[i32],
) -> RecipeRecord {
    RecipeRecord {
        id,
        name: format!("Recipe {id}"),
        slug: format!("recipe-{id}"),
        description: String::new(),
        image: None,
        servings: 4,
        duration: None,
        is_public,
        created_at,
        author_id: 1,
        ingredients: ingredient_ids
            .iter()
            .map(|&ingredient_id| IngredientLink {
                id: ingredient_id,
                name: format!("Ingredient {ingredient_id}"),
                slug: format!("ingredient-{ingredient_id}"),
                quantity: 1.0,
                unit: "g".to_string(),
            })
            .collect(),
        diets: diet_ids
            .iter()
            .map(|&diet_id| DietTag {
                id: diet_id,
                name: format!("Diet {diet_id}"),
            })
            .collect(),
    }
}

pub fn catalog_entry(id: i32, name: &str) -> CatalogIngredient {
    CatalogIngredient {
        id,
        name: name.to_string(),
        slug: name.to_lowercase(),
    }
}

/// A store that serves fixed data and records how it was called.
#[derive(Default)]
pub struct InMemoryStore {
    pub catalog: Vec<CatalogIngredient>,
    pub profiles: HashMap<i32, UserProfileFacts>,
    pub recipes: Vec<RecipeRecord>,
    pub fail_recipes: bool,
    pub fail_catalog: bool,
    pub catalog_calls: AtomicUsize,
    pub recipe_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn recipe_calls(&self) -> usize {
        self.recipe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IngredientCatalog for InMemoryStore {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<CatalogIngredient>, SearchError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog {
            return Err(SearchError::UpstreamSearchFailure(
                "catalog offline".to_string(),
            ));
        }
        let mut found = Vec::new();
        for id in ids {
            if found.iter().any(|i: &CatalogIngredient| i.id == *id) {
                continue;
            }
            if let Some(entry) = self.catalog.iter().find(|i| i.id == *id) {
                found.push(entry.clone());
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl ProfileSource for InMemoryStore {
    async fn load_profile(&self, user_id: UserId) -> Result<UserProfileFacts, SearchError> {
        self.profiles
            .get(&user_id.0)
            .cloned()
            .ok_or(SearchError::ProfileNotFound(user_id.0))
    }
}

#[async_trait]
impl RecipeSource for InMemoryStore {
    async fn find_public_recipes(
        &self,
        _filter: &RecipeFilter,
    ) -> Result<Vec<RecipeRecord>, SearchError> {
        self.recipe_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_recipes {
            return Err(SearchError::UpstreamSearchFailure(
                "recipe store offline".to_string(),
            ));
        }
        Ok(self.recipes.clone())
    }
}
