use super::SeaOrmStorage;
use crate::entity::prelude::{SessionOccurrences, TeachingActivities};
use crate::entity::session_occurrences::Column;
use crate::errors::{Result, TeachAllocError};
use crate::models::activities::entities::Occurrence;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

impl SeaOrmStorage {
    /// 教学活动是否存在
    pub async fn activity_exists_impl(&self, activity_id: i64) -> Result<bool> {
        let result = TeachingActivities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询教学活动失败: {e}")))?;

        Ok(result.is_some())
    }

    /// 列出教学活动的课次
    ///
    /// 给定 `from` 时只返回该日期及以后的课次（无日期的课次被排除）。
    pub async fn list_occurrences_impl(
        &self,
        activity_id: i64,
        from: Option<NaiveDate>,
    ) -> Result<Vec<Occurrence>> {
        let mut select = SessionOccurrences::find().filter(Column::ActivityId.eq(activity_id));

        if let Some(from) = from {
            select = select.filter(Column::SessionDate.gte(from));
        }

        let result = select
            .all(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询课次失败: {e}")))?;

        // 各数据库对空值排序的处理不同，统一在内存中排序
        let mut occurrences: Vec<Occurrence> =
            result.into_iter().map(|m| m.into_occurrence()).collect();
        occurrences.sort_by(Occurrence::schedule_order);

        Ok(occurrences)
    }
}
