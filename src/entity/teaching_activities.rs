//! 教学活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teaching_activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub offering_id: i64,
    pub activity_type: String,
    pub activity_name: String,
    pub mode: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit_offerings::Entity",
        from = "Column::OfferingId",
        to = "super::unit_offerings::Column::Id"
    )]
    UnitOffering,
    #[sea_orm(has_many = "super::session_occurrences::Entity")]
    SessionOccurrences,
    #[sea_orm(has_many = "super::allocations::Entity")]
    Allocations,
}

impl Related<super::unit_offerings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitOffering.def()
    }
}

impl Related<super::session_occurrences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionOccurrences.def()
    }
}

impl Related<super::allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
