use axum::{http::Method, middleware as axum_middleware, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::search::RecipeSearchService;
use crate::server::config::ServerConfig;

pub use error::AppError;

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use middleware::auth;
use routes::{search_routes, user_routes};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub search: Arc<RecipeSearchService>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    db_pool: DatabaseConnection,
    search: Arc<RecipeSearchService>,
    config: Arc<ServerConfig>,
) -> Router {
    let app_state = Arc::new(AppState {
        db_pool,
        search,
        config,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest(
            "/api/recipes",
            search_routes::create_search_router().route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth::identify),
            ),
        )
        .nest(
            "/api/user",
            user_routes::create_user_router().route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth::identify),
            ),
        )
        .with_state(app_state)
        .layer(cors)
}

#[cfg(test)]
pub(crate) fn test_state(
    db_pool: DatabaseConnection,
    store: Arc<crate::search::testing::InMemoryStore>,
    jwt_secret: &str,
) -> Arc<AppState> {
    use crate::search::LocalSearchBackend;
    use crate::server::config::SearchBackendKind;

    let backend = Arc::new(LocalSearchBackend::new(store.clone()));
    let search = Arc::new(RecipeSearchService::new(store.clone(), store, backend));
    let config = Arc::new(ServerConfig {
        database_url: "postgres://unused".to_string(),
        jwt_secret: jwt_secret.to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        log_dir: "logs".to_string(),
        search_backend: SearchBackendKind::Local,
        search_api_url: None,
        search_api_token: String::new(),
        search_timeout_secs: 15,
    });
    Arc::new(AppState {
        db_pool,
        search,
        config,
    })
}
