use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::matcher::{self, MatchCriteria};
use super::{RankedRecipe, RecipeSource, SearchCriteria, SearchError, UserId};

/// Executes the matching step of a search.
/// Implementations either rank locally or delegate to a ranking service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        user_id: UserId,
        criteria: &SearchCriteria,
    ) -> Result<Vec<RankedRecipe>, SearchError>;
}

/// Ranks recipes in-process over a [`RecipeSource`].
pub struct LocalSearchBackend {
    recipes: Arc<dyn RecipeSource>,
}

impl LocalSearchBackend {
    pub fn new(recipes: Arc<dyn RecipeSource>) -> Self {
        Self { recipes }
    }
}

#[async_trait]
impl SearchBackend for LocalSearchBackend {
    async fn search(
        &self,
        _user_id: UserId,
        criteria: &SearchCriteria,
    ) -> Result<Vec<RankedRecipe>, SearchError> {
        let corpus = self
            .recipes
            .find_public_recipes(&criteria.recipe_filter())
            .await?;
        let available_ids = criteria.available_ingredient_ids();

        Ok(matcher::rank(
            corpus,
            &MatchCriteria {
                blacklist_ids: &criteria.blacklist_ids,
                diet_ids: &criteria.diet_ids,
                available_ids: &available_ids,
            },
        ))
    }
}

#[derive(Serialize)]
struct RemoteSearchRequest<'a> {
    user_id: UserId,
    timestamp: String,
    search_criteria: &'a SearchCriteria,
}

#[derive(Deserialize)]
struct RemoteSearchResponse {
    recipes: Vec<RankedRecipe>,
}

/// Delegates ranking to an external service over HTTP.
///
/// Posts `{user_id, timestamp, search_criteria}` to `{base_url}/search-recipes`.
/// Every failure, including hitting the timeout, is an
/// [`SearchError::UpstreamSearchFailure`].
pub struct RemoteSearchBackend {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl RemoteSearchBackend {
    pub fn new(base_url: &str, api_token: &str, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            SearchError::UpstreamSearchFailure(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self {
            client,
            endpoint: format!("{}/search-recipes", base_url.trim_end_matches('/')),
            api_token: api_token.to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for RemoteSearchBackend {
    async fn search(
        &self,
        user_id: UserId,
        criteria: &SearchCriteria,
    ) -> Result<Vec<RankedRecipe>, SearchError> {
        let payload = RemoteSearchRequest {
            user_id,
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            search_criteria: criteria,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(user_id = %user_id, error = %e, "Recipe search request failed.");
                SearchError::UpstreamSearchFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                user_id = %user_id,
                status = %status,
                response = %body,
                "Recipe search service returned an error."
            );
            return Err(SearchError::UpstreamSearchFailure(format!(
                "search service responded with {status}"
            )));
        }

        let body: RemoteSearchResponse = response.json().await.map_err(|e| {
            error!(user_id = %user_id, error = %e, "Unreadable recipe search response.");
            SearchError::UpstreamSearchFailure(format!("invalid search response: {e}"))
        })?;

        info!(
            user_id = %user_id,
            status_code = status.as_u16(),
            results_count = body.recipes.len(),
            "Recipe search performed by remote service."
        );
        Ok(body.recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::IngredientStub;
    use crate::search::testing::{recipe, ts, InMemoryStore};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use std::collections::BTreeSet;

    fn criteria(blacklist: &[i32], available: &[(i32, &str)]) -> SearchCriteria {
        let stubs: Vec<IngredientStub> = available
            .iter()
            .map(|(id, name)| IngredientStub {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        SearchCriteria {
            blacklist_ids: blacklist.iter().copied().collect(),
            diet_ids: BTreeSet::new(),
            frigo_ingredients: Vec::new(),
            form_ingredients: stubs.clone(),
            all_ingredients: stubs,
            servings: 4,
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_local_backend_filters_and_ranks() {
        let store = Arc::new(InMemoryStore {
            recipes: vec![
                recipe(1, ts(1), true, &[1, 2], &[]),
                recipe(2, ts(2), true, &[1, 3], &[]),
                recipe(3, ts(3), true, &[4], &[]),
            ],
            ..Default::default()
        });
        let backend = LocalSearchBackend::new(store.clone());

        let result = backend
            .search(UserId(1), &criteria(&[3], &[(1, "Tomato"), (2, "Onion")]))
            .await
            .unwrap();

        let ids: Vec<i32> = result.iter().map(|r| r.recipe.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.recipe_calls(), 1);
    }

    #[tokio::test]
    async fn test_local_backend_propagates_store_failure() {
        let store = Arc::new(InMemoryStore {
            fail_recipes: true,
            ..Default::default()
        });
        let backend = LocalSearchBackend::new(store);

        let result = backend.search(UserId(1), &criteria(&[], &[])).await;

        assert!(matches!(result, Err(SearchError::UpstreamSearchFailure(_))));
    }

    #[tokio::test]
    async fn test_remote_backend_posts_criteria() {
        let router = Router::new().route(
            "/search-recipes",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(
                    headers.get("authorization").unwrap().to_str().unwrap(),
                    "Bearer secret-token"
                );
                assert_eq!(body["user_id"], 7);
                assert_eq!(body["search_criteria"]["blacklist_ids"], serde_json::json!([3]));
                let ranked = RankedRecipe {
                    recipe: recipe(42, ts(1), true, &[1], &[]),
                    match_count: 1,
                };
                Json(serde_json::json!({ "recipes": [ranked] }))
            }),
        );
        let base_url = serve(router).await;
        let backend = RemoteSearchBackend::new(
            &format!("{base_url}/"),
            "secret-token",
            Duration::from_secs(5),
        )
        .unwrap();

        let result = backend
            .search(UserId(7), &criteria(&[3], &[(1, "Tomato")]))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].recipe.id, 42);
        assert_eq!(result[0].match_count, 1);
    }

    #[tokio::test]
    async fn test_remote_backend_error_status_is_failure() {
        let router = Router::new().route(
            "/search-recipes",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let base_url = serve(router).await;
        let backend = RemoteSearchBackend::new(&base_url, "", Duration::from_secs(5)).unwrap();

        let result = backend.search(UserId(1), &criteria(&[], &[])).await;

        assert!(matches!(result, Err(SearchError::UpstreamSearchFailure(_))));
    }

    #[tokio::test]
    async fn test_remote_backend_body_without_recipes_is_failure() {
        let router = Router::new().route(
            "/search-recipes",
            post(|| async { Json(serde_json::json!({ "results": [] })) }),
        );
        let base_url = serve(router).await;
        let backend = RemoteSearchBackend::new(&base_url, "", Duration::from_secs(5)).unwrap();

        let result = backend.search(UserId(1), &criteria(&[], &[])).await;

        assert!(matches!(result, Err(SearchError::UpstreamSearchFailure(_))));
    }

    #[tokio::test]
    async fn test_remote_backend_times_out() {
        let router = Router::new().route(
            "/search-recipes",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(serde_json::json!({ "recipes": [] }))
            }),
        );
        let base_url = serve(router).await;
        let backend =
            RemoteSearchBackend::new(&base_url, "", Duration::from_millis(200)).unwrap();

        let result = backend.search(UserId(1), &criteria(&[], &[])).await;

        assert!(matches!(result, Err(SearchError::UpstreamSearchFailure(_))));
    }
}
