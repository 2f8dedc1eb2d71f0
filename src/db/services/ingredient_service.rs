use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use crate::db::entities::{diet, ingredient};

// --- Ingredient Catalog Functions ---

/// Fetches the ingredients with the given ids in one query.
/// The result follows the order of `ids`; unknown ids are skipped.
pub async fn get_ingredients_by_ids(
    db: &DatabaseConnection,
    ids: &[i32],
) -> Result<Vec<ingredient::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<i32, ingredient::Model> = ingredient::Entity::find()
        .filter(ingredient::Column::Id.is_in(ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Retrieves the whole ingredient catalog, sorted by name.
pub async fn get_all_ingredients(db: &DatabaseConnection) -> Result<Vec<ingredient::Model>, DbErr> {
    ingredient::Entity::find()
        .order_by_asc(ingredient::Column::Name)
        .all(db)
        .await
}

/// Retrieves the diets with the given ids, sorted by name.
pub async fn get_diets_by_ids(
    db: &DatabaseConnection,
    ids: &[i32],
) -> Result<Vec<diet::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    diet::Entity::find()
        .filter(diet::Column::Id.is_in(ids.to_vec()))
        .order_by_asc(diet::Column::Name)
        .all(db)
        .await
}
