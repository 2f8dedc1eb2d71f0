use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identity of the user a search runs for. Always passed explicitly; the core
/// never looks up a "current user" on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimal `(id, name)` projection of an ingredient, only alive for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientStub {
    pub id: i32,
    pub name: String,
}

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIngredient {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<CatalogIngredient> for IngredientStub {
    fn from(ingredient: CatalogIngredient) -> Self {
        IngredientStub {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLink {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietTag {
    pub id: i32,
    pub name: String,
}

/// A recipe together with its ingredient lines and diet tags, as handed to
/// the matcher and serialized back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub servings: i32,
    pub duration: Option<i32>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: i32,
    pub ingredients: Vec<IngredientLink>,
    pub diets: Vec<DietTag>,
}

impl RecipeRecord {
    pub fn has_ingredient_in(&self, ids: &BTreeSet<i32>) -> bool {
        self.ingredients.iter().any(|link| ids.contains(&link.id))
    }

    pub fn has_diet_in(&self, ids: &BTreeSet<i32>) -> bool {
        self.diets.iter().any(|diet| ids.contains(&diet.id))
    }

    /// Number of ingredient lines whose ingredient is in `available`.
    pub fn match_count(&self, available: &BTreeSet<i32>) -> usize {
        self.ingredients
            .iter()
            .filter(|link| available.contains(&link.id))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecipe {
    #[serde(flatten)]
    pub recipe: RecipeRecord,
    pub match_count: usize,
}

/// Filter pushed down to a [`RecipeSource`](super::RecipeSource).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub exclude_ingredient_ids: BTreeSet<i32>,
    /// Empty means "no diet restriction".
    pub require_any_diet_ids: BTreeSet<i32>,
}

/// Everything a search was run with. Echoed back to the client and sent as
/// is to the remote ranking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub blacklist_ids: BTreeSet<i32>,
    pub diet_ids: BTreeSet<i32>,
    pub frigo_ingredients: Vec<IngredientStub>,
    pub form_ingredients: Vec<IngredientStub>,
    pub all_ingredients: Vec<IngredientStub>,
    pub servings: u32,
}

impl SearchCriteria {
    pub fn available_ingredient_ids(&self) -> BTreeSet<i32> {
        self.all_ingredients.iter().map(|stub| stub.id).collect()
    }

    pub fn recipe_filter(&self) -> RecipeFilter {
        RecipeFilter {
            exclude_ingredient_ids: self.blacklist_ids.clone(),
            require_any_diet_ids: self.diet_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub recipes: Vec<RankedRecipe>,
    pub search_criteria: SearchCriteria,
    pub total_results: usize,
}
