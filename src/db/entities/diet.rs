use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "diets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        super::recipe_diet::Relation::Recipe.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::recipe_diet::Relation::Diet.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
