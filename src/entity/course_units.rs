//! 课程单元实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "course_units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub unit_code: String,
    pub unit_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::unit_offerings::Entity")]
    UnitOfferings,
}

impl Related<super::unit_offerings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitOfferings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
