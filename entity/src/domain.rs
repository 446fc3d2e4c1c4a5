use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product area catalog. Products refer to a domain by name only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "domains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("domains have no relations")
    }
}

impl ActiveModelBehavior for ActiveModel {}
