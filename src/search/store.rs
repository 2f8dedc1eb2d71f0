//! Database-backed implementations of the search read traits.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::{
    CatalogIngredient, DietTag, IngredientCatalog, IngredientLink, IngredientStub, ProfileSource,
    RecipeFilter, RecipeRecord, RecipeSource, SearchError, UserId, UserProfileFacts,
};
use crate::db::entities::ingredient;
use crate::db::services::{self, RecipeWithDetails};

#[derive(Clone)]
pub struct DatabaseSources {
    db: DatabaseConnection,
}

impl DatabaseSources {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<ingredient::Model> for CatalogIngredient {
    fn from(model: ingredient::Model) -> Self {
        CatalogIngredient {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

impl From<RecipeWithDetails> for RecipeRecord {
    fn from(details: RecipeWithDetails) -> Self {
        let RecipeWithDetails {
            recipe,
            ingredients,
            diets,
        } = details;
        RecipeRecord {
            id: recipe.id,
            name: recipe.name,
            slug: recipe.slug,
            description: recipe.description,
            image: recipe.image,
            servings: recipe.servings,
            duration: recipe.duration,
            is_public: recipe.is_public,
            created_at: recipe.created_at,
            author_id: recipe.user_id,
            ingredients: ingredients
                .into_iter()
                .map(|(line, ingredient)| IngredientLink {
                    id: ingredient.id,
                    name: ingredient.name,
                    slug: ingredient.slug,
                    quantity: line.quantity,
                    unit: line.unit,
                })
                .collect(),
            diets: diets
                .into_iter()
                .map(|diet| DietTag {
                    id: diet.id,
                    name: diet.name,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl IngredientCatalog for DatabaseSources {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<CatalogIngredient>, SearchError> {
        let models = services::get_ingredients_by_ids(&self.db, ids).await?;
        Ok(models.into_iter().map(CatalogIngredient::from).collect())
    }
}

#[async_trait]
impl ProfileSource for DatabaseSources {
    async fn load_profile(&self, user_id: UserId) -> Result<UserProfileFacts, SearchError> {
        let rows = services::get_profile_rows(&self.db, user_id.0)
            .await?
            .ok_or(SearchError::ProfileNotFound(user_id.0))?;

        Ok(UserProfileFacts {
            blacklist_ids: rows.blacklist_ids.into_iter().collect(),
            diet_ids: rows.diet_ids.into_iter().collect(),
            fridge: rows.fridge.map(|ingredients| {
                ingredients
                    .into_iter()
                    .map(|i| IngredientStub::from(CatalogIngredient::from(i)))
                    .collect()
            }),
        })
    }
}

#[async_trait]
impl RecipeSource for DatabaseSources {
    async fn find_public_recipes(
        &self,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeRecord>, SearchError> {
        let recipes = services::find_public_recipes(
            &self.db,
            &filter.exclude_ingredient_ids,
            &filter.require_any_diet_ids,
        )
        .await?;
        Ok(recipes.into_iter().map(RecipeRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::{diet, recipe, recipe_ingredient, user};
    use crate::search::testing::ts;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_recipe_details_become_record() {
        let details = RecipeWithDetails {
            recipe: recipe::Model {
                id: 5,
                user_id: 2,
                name: "Ratatouille".to_string(),
                slug: "ratatouille".to_string(),
                description: "Slow-cooked vegetables".to_string(),
                image: None,
                servings: 6,
                duration: Some(90),
                is_public: true,
                created_at: ts(3),
            },
            ingredients: vec![(
                recipe_ingredient::Model {
                    id: 11,
                    recipe_id: 5,
                    ingredient_id: 1,
                    quantity: 2.5,
                    unit: "kg".to_string(),
                },
                ingredient::Model {
                    id: 1,
                    name: "Tomato".to_string(),
                    slug: "tomato".to_string(),
                    created_at: ts(0),
                    updated_at: ts(0),
                },
            )],
            diets: vec![diet::Model {
                id: 10,
                name: "Vegan".to_string(),
            }],
        };

        let record = RecipeRecord::from(details);

        assert_eq!(record.author_id, 2);
        assert_eq!(record.duration, Some(90));
        assert_eq!(
            record.ingredients,
            vec![IngredientLink {
                id: 1,
                name: "Tomato".to_string(),
                slug: "tomato".to_string(),
                quantity: 2.5,
                unit: "kg".to_string(),
            }]
        );
        assert_eq!(
            record.diets,
            vec![DietTag {
                id: 10,
                name: "Vegan".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_user_is_profile_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let sources = DatabaseSources::new(db);

        let result = sources.load_profile(UserId(5)).await;

        assert_eq!(result, Err(SearchError::ProfileNotFound(5)));
    }
}
