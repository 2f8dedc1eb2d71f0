use serde::{Deserialize, Serialize};

// JWT Claims structure, as issued by the session provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user email)
    pub user_id: i32,
    pub exp: usize, // Expiration time (timestamp)
}

/// Struct to hold authenticated user details, to be passed as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct DietResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserDataResponse {
    pub ingredients: Vec<IngredientResponse>,
    pub blacklist: Vec<IngredientResponse>,
    pub diets: Vec<DietResponse>,
}
