use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipes,

    #[sea_orm(has_one = "super::fridge::Entity")]
    Fridge,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<super::fridge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fridge.def()
    }
}

impl Related<super::diet::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_diet::Relation::Diet.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_diet::Relation::User.def().rev())
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_ingredient_blacklist::Relation::Ingredient.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_ingredient_blacklist::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
