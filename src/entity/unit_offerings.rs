//! 开课实体（某单元在某学年学期的一次开设）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "unit_offerings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub unit_code: String,
    pub year: i32,
    pub session: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_units::Entity",
        from = "Column::UnitCode",
        to = "super::course_units::Column::UnitCode"
    )]
    CourseUnit,
    #[sea_orm(has_many = "super::teaching_activities::Entity")]
    TeachingActivities,
}

impl Related<super::course_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseUnit.def()
    }
}

impl Related<super::teaching_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeachingActivities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
