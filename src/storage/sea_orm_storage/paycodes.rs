use super::SeaOrmStorage;
use crate::entity::paycodes::{Column, Entity as Paycodes};
use crate::errors::{Result, TeachAllocError};
use crate::models::paycodes::entities::Paycode;
use sea_orm::{EntityTrait, QueryOrder};

impl SeaOrmStorage {
    /// 列出薪酬代码
    pub async fn list_paycodes_impl(&self) -> Result<Vec<Paycode>> {
        let result = Paycodes::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询薪酬代码失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_paycode()).collect())
    }
}
