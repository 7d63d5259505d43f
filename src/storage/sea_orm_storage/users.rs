use super::SeaOrmStorage;
use crate::entity::allocations::Column as AllocationColumn;
use crate::entity::prelude::{Allocations, TeachingActivities};
use crate::entity::teaching_activities::Column as ActivityColumn;
use crate::entity::unit_offerings::Column as OfferingColumn;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, TeachAllocError};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            email: Set(req.email),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 在某单元任一开课中持有分配的用户，按姓、名排序
    pub async fn list_tutors_by_unit_impl(&self, unit_code: &str) -> Result<Vec<User>> {
        let activity_ids: Vec<i64> = TeachingActivities::find()
            .select_only()
            .column(ActivityColumn::Id)
            .join(
                JoinType::InnerJoin,
                crate::entity::teaching_activities::Relation::UnitOffering.def(),
            )
            .filter(OfferingColumn::UnitCode.eq(unit_code))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询教学活动失败: {e}")))?;

        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Option<i64>> = Allocations::find()
            .select_only()
            .column(AllocationColumn::UserId)
            .filter(AllocationColumn::ActivityId.is_in(activity_ids))
            .filter(AllocationColumn::UserId.is_not_null())
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询单元导师失败: {e}")))?;

        let user_ids: Vec<i64> = user_ids.into_iter().flatten().collect();
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(user_ids))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询单元导师失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }
}

