//! 薪酬代码实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "paycodes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub paycode_description: Option<String>,
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_paycode(self) -> crate::models::paycodes::entities::Paycode {
        crate::models::paycodes::entities::Paycode {
            code: self.code,
            paycode_description: self.paycode_description,
            amount: self.amount,
        }
    }
}
