use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程单元表
        manager
            .create_table(
                Table::create()
                    .table(CourseUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseUnits::UnitCode)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseUnits::UnitName).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 开课表
        manager
            .create_table(
                Table::create()
                    .table(UnitOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitOfferings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnitOfferings::UnitCode).string().not_null())
                    .col(ColumnDef::new(UnitOfferings::Year).integer().not_null())
                    .col(ColumnDef::new(UnitOfferings::Session).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UnitOfferings::Table, UnitOfferings::UnitCode)
                            .to(CourseUnits::Table, CourseUnits::UnitCode)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教学活动表
        manager
            .create_table(
                Table::create()
                    .table(TeachingActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeachingActivities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeachingActivities::OfferingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingActivities::ActivityType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingActivities::ActivityName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingActivities::Mode)
                            .string()
                            .not_null()
                            .default("scheduled"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeachingActivities::Table, TeachingActivities::OfferingId)
                            .to(UnitOfferings::Table, UnitOfferings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课次表
        manager
            .create_table(
                Table::create()
                    .table(SessionOccurrences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionOccurrences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SessionOccurrences::ActivityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SessionOccurrences::SessionDate).date().null())
                    .col(ColumnDef::new(SessionOccurrences::StartAt).time().null())
                    .col(ColumnDef::new(SessionOccurrences::EndAt).time().null())
                    .col(ColumnDef::new(SessionOccurrences::Location).string().null())
                    .col(ColumnDef::new(SessionOccurrences::Note).text().null())
                    .col(
                        ColumnDef::new(SessionOccurrences::IsCancelled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionOccurrences::Table, SessionOccurrences::ActivityId)
                            .to(TeachingActivities::Table, TeachingActivities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 薪酬代码表
        manager
            .create_table(
                Table::create()
                    .table(Paycodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Paycodes::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Paycodes::PaycodeDescription)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Paycodes::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .to_owned(),
            )
            .await?;

        // 分配表
        manager
            .create_table(
                Table::create()
                    .table(Allocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Allocations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Allocations::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(Allocations::OccurrenceId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Allocations::ActivityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Allocations::PaycodeId).string().null())
                    .col(ColumnDef::new(Allocations::Status).string().not_null())
                    .col(ColumnDef::new(Allocations::TeachingRole).string().null())
                    .col(ColumnDef::new(Allocations::Hours).double().null())
                    .col(ColumnDef::new(Allocations::Note).text().null())
                    .col(ColumnDef::new(Allocations::Mode).string().not_null())
                    .col(
                        ColumnDef::new(Allocations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Allocations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Allocations::Table, Allocations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Allocations::Table, Allocations::OccurrenceId)
                            .to(SessionOccurrences::Table, SessionOccurrences::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Allocations::Table, Allocations::ActivityId)
                            .to(TeachingActivities::Table, TeachingActivities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Allocations::Table, Allocations::PaycodeId)
                            .to(Paycodes::Table, Paycodes::Code)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 申请表
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requests::RequesterId).big_integer().not_null())
                    .col(ColumnDef::new(Requests::AllocationId).big_integer().not_null())
                    .col(ColumnDef::new(Requests::RequestType).string().not_null())
                    .col(ColumnDef::new(Requests::RequestStatus).string().not_null())
                    .col(ColumnDef::new(Requests::RequestReason).text().null())
                    .col(ColumnDef::new(Requests::Details).text().null())
                    .col(ColumnDef::new(Requests::ReviewerId).big_integer().null())
                    .col(ColumnDef::new(Requests::ReviewerNote).text().null())
                    .col(ColumnDef::new(Requests::RejectionReason).text().null())
                    .col(ColumnDef::new(Requests::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Requests::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Requests::Table, Requests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Requests::Table, Requests::AllocationId)
                            .to(Allocations::Table, Allocations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Requests::Table, Requests::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_session_occurrences_activity_date")
                    .table(SessionOccurrences::Table)
                    .col(SessionOccurrences::ActivityId)
                    .col(SessionOccurrences::SessionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_allocations_occurrence_id")
                    .table(Allocations::Table)
                    .col(Allocations::OccurrenceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_allocations_activity_id")
                    .table(Allocations::Table)
                    .col(Allocations::ActivityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_requests_allocation_id")
                    .table(Requests::Table)
                    .col(Requests::AllocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Allocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Paycodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionOccurrences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeachingActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UnitOfferings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseUnits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseUnits {
    #[sea_orm(iden = "course_units")]
    Table,
    UnitCode,
    UnitName,
}

#[derive(DeriveIden)]
enum UnitOfferings {
    #[sea_orm(iden = "unit_offerings")]
    Table,
    Id,
    UnitCode,
    Year,
    Session,
}

#[derive(DeriveIden)]
enum TeachingActivities {
    #[sea_orm(iden = "teaching_activities")]
    Table,
    Id,
    OfferingId,
    ActivityType,
    ActivityName,
    Mode,
}

#[derive(DeriveIden)]
enum SessionOccurrences {
    #[sea_orm(iden = "session_occurrences")]
    Table,
    Id,
    ActivityId,
    SessionDate,
    StartAt,
    EndAt,
    Location,
    Note,
    IsCancelled,
}

#[derive(DeriveIden)]
enum Paycodes {
    #[sea_orm(iden = "paycodes")]
    Table,
    Code,
    PaycodeDescription,
    Amount,
}

#[derive(DeriveIden)]
enum Allocations {
    #[sea_orm(iden = "allocations")]
    Table,
    Id,
    UserId,
    OccurrenceId,
    ActivityId,
    PaycodeId,
    Status,
    TeachingRole,
    Hours,
    Note,
    Mode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Requests {
    #[sea_orm(iden = "requests")]
    Table,
    Id,
    RequesterId,
    AllocationId,
    RequestType,
    RequestStatus,
    RequestReason,
    Details,
    ReviewerId,
    ReviewerNote,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}
