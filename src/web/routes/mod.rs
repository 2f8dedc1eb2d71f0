pub mod search_routes;
pub mod user_routes;
