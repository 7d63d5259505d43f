//! 分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "allocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub occurrence_id: Option<i64>,
    pub activity_id: i64,
    pub paycode_id: Option<String>,
    pub status: String,
    pub teaching_role: Option<String>,
    pub hours: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub mode: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Tutor,
    #[sea_orm(
        belongs_to = "super::session_occurrences::Entity",
        from = "Column::OccurrenceId",
        to = "super::session_occurrences::Column::Id"
    )]
    Occurrence,
    #[sea_orm(
        belongs_to = "super::teaching_activities::Entity",
        from = "Column::ActivityId",
        to = "super::teaching_activities::Column::Id"
    )]
    TeachingActivity,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tutor.def()
    }
}

impl Related<super::session_occurrences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occurrence.def()
    }
}

impl Related<super::teaching_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeachingActivity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
