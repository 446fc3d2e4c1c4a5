use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Name of a business unit; not a foreign key.
    pub business_unit: Option<String>,
    #[sea_orm(indexed)]
    pub role: Option<String>,
    pub bid: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub capitalization: Option<f64>,
    /// Direct manager or lead. Top-level managers point at the chief id,
    /// which has no row of its own.
    #[sea_orm(indexed)]
    pub superiors: Option<Uuid>,
}

impl Model {
    /// First, middle and last name joined by single spaces.
    pub fn display_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.middle_name.as_str(),
            self.last_name.as_str(),
        ]
        .join(" ")
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Superior,
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Superior => Entity::belongs_to(Entity)
                .from(Column::Superiors)
                .to(Column::Id)
                .into(),
            Self::Product => Entity::has_many(super::product::Entity).into(),
        }
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_components_with_single_spaces() {
        let model = Model {
            id: Uuid::nil(),
            first_name: "Ada".into(),
            middle_name: "Augusta".into(),
            last_name: "King".into(),
            business_unit: None,
            role: None,
            bid: None,
            capitalization: None,
            superiors: None,
        };
        assert_eq!(model.display_name(), "Ada Augusta King");
    }
}
