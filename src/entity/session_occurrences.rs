//! 课次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session_occurrences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub activity_id: i64,
    pub session_date: Option<Date>,
    pub start_at: Option<Time>,
    pub end_at: Option<Time>,
    pub location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub is_cancelled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teaching_activities::Entity",
        from = "Column::ActivityId",
        to = "super::teaching_activities::Column::Id"
    )]
    TeachingActivity,
    #[sea_orm(has_many = "super::allocations::Entity")]
    Allocations,
}

impl Related<super::teaching_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeachingActivity.def()
    }
}

impl Related<super::allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_occurrence(self) -> crate::models::activities::entities::Occurrence {
        use crate::models::activities::entities::Occurrence;

        Occurrence {
            id: self.id,
            activity_id: self.activity_id,
            session_date: self.session_date,
            start_at: self.start_at,
            end_at: self.end_at,
            location: self.location,
            note: self.note,
            is_cancelled: self.is_cancelled,
        }
    }
}
