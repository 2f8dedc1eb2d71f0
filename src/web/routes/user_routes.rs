use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::db::entities::ingredient;
use crate::db::services;
use crate::web::models::{AuthenticatedUser, DietResponse, IngredientResponse, UserDataResponse};
use crate::web::{AppError, AppState};

pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new().route("/data", get(get_user_data))
}

fn to_ingredient_response(model: ingredient::Model) -> IngredientResponse {
    IngredientResponse {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

/// Catalog plus the caller's blacklist and diets, used by clients to build
/// the search form.
async fn get_user_data(
    authenticated_user: Option<Extension<AuthenticatedUser>>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserDataResponse>, AppError> {
    let Extension(user) = authenticated_user
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    let db = &app_state.db_pool;

    let profile = services::get_profile_rows(db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", user.id)))?;

    let (ingredients, blacklist, diets) = futures::try_join!(
        services::get_all_ingredients(db),
        services::get_ingredients_by_ids(db, &profile.blacklist_ids),
        services::get_diets_by_ids(db, &profile.diet_ids)
    )?;

    Ok(Json(UserDataResponse {
        ingredients: ingredients.into_iter().map(to_ingredient_response).collect(),
        blacklist: blacklist.into_iter().map(to_ingredient_response).collect(),
        diets: diets
            .into_iter()
            .map(|diet| DietResponse {
                id: diet.id,
                name: diet.name,
            })
            .collect(),
    }))
}
