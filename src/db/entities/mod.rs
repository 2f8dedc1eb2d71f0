//! SeaORM entities for the tables the recipe search reads.
//!
//! Rows are written by the catalog/CRUD service; this crate only queries them.

pub mod diet;
pub mod fridge;
pub mod fridge_ingredient;
pub mod ingredient;
pub mod recipe;
pub mod recipe_diet;
pub mod recipe_ingredient;
pub mod user;
pub mod user_diet;
pub mod user_ingredient_blacklist;
