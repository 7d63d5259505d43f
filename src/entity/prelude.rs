//! 预导入模块，方便使用

pub use super::allocations::{
    ActiveModel as AllocationActiveModel, Entity as Allocations, Model as AllocationModel,
};
pub use super::course_units::{Entity as CourseUnits, Model as CourseUnitModel};
pub use super::paycodes::{Entity as Paycodes, Model as PaycodeModel};
pub use super::requests::{
    ActiveModel as RequestActiveModel, Entity as Requests, Model as RequestModel,
};
pub use super::session_occurrences::{
    ActiveModel as OccurrenceActiveModel, Entity as SessionOccurrences, Model as OccurrenceModel,
};
pub use super::teaching_activities::{
    ActiveModel as ActivityActiveModel, Entity as TeachingActivities, Model as ActivityModel,
};
pub use super::unit_offerings::{Entity as UnitOfferings, Model as UnitOfferingModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
