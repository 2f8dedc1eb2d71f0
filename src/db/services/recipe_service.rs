use futures::try_join;
use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};
use std::collections::{BTreeSet, HashMap};

use crate::db::entities::{diet, ingredient, recipe, recipe_diet, recipe_ingredient};

/// A recipe row with its ingredient lines (in insertion order) and diets.
#[derive(Debug, Clone)]
pub struct RecipeWithDetails {
    pub recipe: recipe::Model,
    pub ingredients: Vec<(recipe_ingredient::Model, ingredient::Model)>,
    pub diets: Vec<diet::Model>,
}

// --- Recipe Search Functions ---

/// Builds the query for public recipes, newest first.
///
/// Recipes using any ingredient of `exclude_ingredient_ids` are left out, and
/// if `require_any_diet_ids` is not empty only recipes tagged with at least one
/// of those diets are returned.
pub fn public_recipes_query(
    exclude_ingredient_ids: &BTreeSet<i32>,
    require_any_diet_ids: &BTreeSet<i32>,
) -> Select<recipe::Entity> {
    let mut query = recipe::Entity::find().filter(recipe::Column::IsPublic.eq(true));

    if !exclude_ingredient_ids.is_empty() {
        query = query.filter(
            recipe::Column::Id.not_in_subquery(
                Query::select()
                    .column(recipe_ingredient::Column::RecipeId)
                    .from(recipe_ingredient::Entity)
                    .and_where(
                        recipe_ingredient::Column::IngredientId
                            .is_in(exclude_ingredient_ids.iter().copied()),
                    )
                    .to_owned(),
            ),
        );
    }

    if !require_any_diet_ids.is_empty() {
        query = query.filter(
            recipe::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_diet::Column::RecipeId)
                    .from(recipe_diet::Entity)
                    .and_where(
                        recipe_diet::Column::DietId.is_in(require_any_diet_ids.iter().copied()),
                    )
                    .to_owned(),
            ),
        );
    }

    query
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
}

/// Retrieves public recipes with their details, filtered as in
/// [`public_recipes_query`].
pub async fn find_public_recipes(
    db: &DatabaseConnection,
    exclude_ingredient_ids: &BTreeSet<i32>,
    require_any_diet_ids: &BTreeSet<i32>,
) -> Result<Vec<RecipeWithDetails>, DbErr> {
    let recipes = public_recipes_query(exclude_ingredient_ids, require_any_diet_ids)
        .all(db)
        .await?;

    attach_details(db, recipes).await
}

/// Loads ingredient lines and diet tags for `recipes` with two queries.
async fn attach_details(
    db: &DatabaseConnection,
    recipes: Vec<recipe::Model>,
) -> Result<Vec<RecipeWithDetails>, DbErr> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();

    let lines_future = recipe_ingredient::Entity::find()
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.clone()))
        .order_by_asc(recipe_ingredient::Column::Id)
        .find_also_related(ingredient::Entity)
        .all(db);

    let diets_future = recipe_diet::Entity::find()
        .filter(recipe_diet::Column::RecipeId.is_in(recipe_ids))
        .order_by_asc(recipe_diet::Column::DietId)
        .find_also_related(diet::Entity)
        .all(db);

    let (lines, diet_tags) = try_join!(lines_future, diets_future)?;

    let mut lines_by_recipe: HashMap<i32, Vec<(recipe_ingredient::Model, ingredient::Model)>> =
        HashMap::new();
    for (line, ingredient) in lines {
        if let Some(ingredient) = ingredient {
            lines_by_recipe
                .entry(line.recipe_id)
                .or_default()
                .push((line, ingredient));
        }
    }

    let mut diets_by_recipe: HashMap<i32, Vec<diet::Model>> = HashMap::new();
    for (link, diet) in diet_tags {
        if let Some(diet) = diet {
            diets_by_recipe.entry(link.recipe_id).or_default().push(diet);
        }
    }

    Ok(recipes
        .into_iter()
        .map(|recipe| RecipeWithDetails {
            ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
            diets: diets_by_recipe.remove(&recipe.id).unwrap_or_default(),
            recipe,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    fn sql(exclude: &[i32], diets: &[i32]) -> String {
        let exclude: BTreeSet<i32> = exclude.iter().copied().collect();
        let diets: BTreeSet<i32> = diets.iter().copied().collect();
        public_recipes_query(&exclude, &diets)
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    const ORDER: &str = r#"ORDER BY "recipes"."created_at" DESC, "recipes"."id" DESC"#;

    #[test]
    fn test_query_without_filters() {
        let sql = sql(&[], &[]);

        assert!(sql.contains(&format!(r#"WHERE "recipes"."is_public" = TRUE {ORDER}"#)));
        assert!(!sql.contains("recipe_ingredients"));
        assert!(!sql.contains("recipe_diets"));
    }

    #[test]
    fn test_query_excludes_blacklisted_ingredients() {
        let sql = sql(&[5, 3], &[]);

        assert!(sql.contains(
            r#""recipes"."id" NOT IN (SELECT "recipe_id" FROM "recipe_ingredients" WHERE "#
        ));
        assert!(sql.contains(r#""ingredient_id" IN (3, 5))"#));
        assert!(!sql.contains("recipe_diets"));
        assert!(sql.ends_with(ORDER));
    }

    #[test]
    fn test_query_requires_any_diet() {
        let sql = sql(&[], &[11, 10]);

        assert!(
            sql.contains(r#""recipes"."id" IN (SELECT "recipe_id" FROM "recipe_diets" WHERE "#)
        );
        assert!(sql.contains(r#""diet_id" IN (10, 11))"#));
        assert!(!sql.contains("NOT IN"));
        assert!(!sql.contains("recipe_ingredients"));
        assert!(sql.ends_with(ORDER));
    }

    #[test]
    fn test_query_combines_both_filters() {
        let sql = sql(&[3], &[10, 11]);

        let public = sql.find(r#""recipes"."is_public" = TRUE"#).unwrap();
        let blacklist = sql
            .find(r#""recipes"."id" NOT IN (SELECT "recipe_id" FROM "recipe_ingredients""#)
            .unwrap();
        let diets = sql
            .find(r#""recipes"."id" IN (SELECT "recipe_id" FROM "recipe_diets""#)
            .unwrap();
        assert!(public < blacklist && blacklist < diets);
        assert!(sql.contains(r#""ingredient_id" IN (3))"#));
        assert!(sql.contains(r#""diet_id" IN (10, 11))"#));
        assert!(sql.ends_with(ORDER));
    }
}
