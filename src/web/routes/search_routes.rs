use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::search::{SearchRequest, SearchResponse, UserId};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

// --- Request/Response Structs ---

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    frigo: Option<String>,
    #[serde(rename = "ingredientsForm")]
    ingredients_form: Option<String>,
    servings: Option<String>,
}

impl SearchParams {
    fn into_request(self) -> SearchRequest {
        SearchRequest {
            use_fridge: is_truthy(self.frigo.as_deref()),
            ingredients_form: self.ingredients_form.unwrap_or_default(),
            servings: self
                .servings
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|s| *s > 0),
        }
    }
}

/// Loose boolean reading of a query flag: absent, empty, `0`, `false`, `no`
/// and `off` are false, anything else is true.
pub fn is_truthy(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "0" | "false" | "no" | "off"),
    }
}

// --- Route Handlers ---

async fn search_recipes_handler(
    authenticated_user: Option<Extension<AuthenticatedUser>>,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let user_id = authenticated_user.map(|Extension(user)| UserId(user.id));
    let response = app_state
        .search
        .search(user_id, &params.into_request())
        .await?;
    Ok(Json(response))
}

// --- Router ---

pub fn create_search_router() -> Router<Arc<AppState>> {
    Router::new().route("/search", get(search_recipes_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_flag() {
        for value in ["1", "true", "TRUE", "yes", "on", "frigo"] {
            assert!(is_truthy(Some(value)), "{value} should be true");
        }
        for value in ["", " ", "0", "false", "False", "no", "off"] {
            assert!(!is_truthy(Some(value)), "{value:?} should be false");
        }
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_params_defaults() {
        let request = SearchParams::default().into_request();

        assert_eq!(request, SearchRequest::default());
    }

    #[test]
    fn test_params_servings() {
        let params = SearchParams {
            frigo: Some("1".to_string()),
            ingredients_form: Some("1,2".to_string()),
            servings: Some(" 6".to_string()),
        };
        let request = params.into_request();

        assert!(request.use_fridge);
        assert_eq!(request.ingredients_form, "1,2");
        assert_eq!(request.servings, Some(6));

        let params = SearchParams {
            servings: Some("many".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_request().servings, None);
    }
}
