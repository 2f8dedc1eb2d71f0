use futures::try_join;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::db::entities::{
    fridge, fridge_ingredient, ingredient, user, user_diet, user_ingredient_blacklist,
};

// --- User Profile Functions ---

/// Retrieves a user by their ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(user_id).one(db).await
}

/// Ids of the ingredients a user never wants to see in a recipe.
pub async fn get_blacklist_ids(db: &DatabaseConnection, user_id: i32) -> Result<Vec<i32>, DbErr> {
    let rows = user_ingredient_blacklist::Entity::find()
        .filter(user_ingredient_blacklist::Column::UserId.eq(user_id))
        .order_by_asc(user_ingredient_blacklist::Column::IngredientId)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.ingredient_id).collect())
}

/// Ids of the diets a user follows.
pub async fn get_diet_ids(db: &DatabaseConnection, user_id: i32) -> Result<Vec<i32>, DbErr> {
    let rows = user_diet::Entity::find()
        .filter(user_diet::Column::UserId.eq(user_id))
        .order_by_asc(user_diet::Column::DietId)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.diet_id).collect())
}

/// Ingredients currently in the user's fridge, ordered by ingredient id.
/// Returns `None` if the user has no fridge.
pub async fn get_fridge_ingredients(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<Vec<ingredient::Model>>, DbErr> {
    let Some(fridge) = fridge::Entity::find()
        .filter(fridge::Column::UserId.eq(user_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let rows = fridge_ingredient::Entity::find()
        .filter(fridge_ingredient::Column::FridgeId.eq(fridge.id))
        .order_by_asc(fridge_ingredient::Column::IngredientId)
        .find_also_related(ingredient::Entity)
        .all(db)
        .await?;

    Ok(Some(rows.into_iter().filter_map(|(_, ingredient)| ingredient).collect()))
}

#[derive(Debug, Clone)]
pub struct ProfileRows {
    pub blacklist_ids: Vec<i32>,
    pub diet_ids: Vec<i32>,
    pub fridge: Option<Vec<ingredient::Model>>,
}

/// Everything a search needs to know about a user, fetched in parallel.
/// Returns `None` if the user does not exist.
pub async fn get_profile_rows(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<ProfileRows>, DbErr> {
    if get_user_by_id(db, user_id).await?.is_none() {
        return Ok(None);
    }

    let (blacklist_ids, diet_ids, fridge) = try_join!(
        get_blacklist_ids(db, user_id),
        get_diet_ids(db, user_id),
        get_fridge_ingredients(db, user_id)
    )?;
    Ok(Some(ProfileRows {
        blacklist_ids,
        diet_ids,
        fridge,
    }))
}
