use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::allocations::{self, Column};
use crate::entity::prelude::{
    ActivityActiveModel, ActivityModel, AllocationActiveModel, AllocationModel, Allocations,
    CourseUnitModel, CourseUnits, OccurrenceActiveModel, OccurrenceModel, Paycodes,
    SessionOccurrences, TeachingActivities, UnitOfferingModel, UnitOfferings, UserModel, Users,
};
use crate::entity::{session_occurrences, teaching_activities, unit_offerings};
use crate::errors::{Result, TeachAllocError};
use crate::models::allocations::{
    entities::{AllocationMode, AllocationRow, AllocationStatus, derived_hours},
    propagation::{PropagateField, merge_note},
    requests::{AllocationEdit, AllocationFilter, CreateUnscheduledRequest},
    weekday::shift_to_weekday,
};
use crate::models::paycodes::entities::paycode_for_activity_type;
use crate::storage::AllocationUpdate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

/// 未排课分配的默认教学角色
const UNSCHEDULED_TEACHING_ROLE: &str = "Marker";

fn db_error(action: &'static str) -> impl FnOnce(DbErr) -> TeachAllocError {
    move |e| TeachAllocError::database_operation(format!("{action}: {e}"))
}

impl SeaOrmStorage {
    /// 按筛选条件列出分配行
    pub async fn list_allocation_rows_impl(
        &self,
        filter: &AllocationFilter,
        limit: Option<u64>,
    ) -> Result<Vec<AllocationRow>> {
        let mut select = Allocations::find();

        // 单元与活动类型先解析为教学活动 ID
        let unit_code = filter.unit_code.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let activity_type = filter
            .activity_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if unit_code.is_some() || activity_type.is_some() {
            let activity_ids = find_activity_ids(&self.db, unit_code, activity_type).await?;
            if activity_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::ActivityId.is_in(activity_ids));
        }

        if let Some(activity_id) = filter.activity_id {
            select = select.filter(Column::ActivityId.eq(activity_id));
        }

        if let Some(status) = filter.status.as_deref().filter(|s| !s.trim().is_empty()) {
            let status = status
                .parse::<AllocationStatus>()
                .map_err(TeachAllocError::validation)?;
            select = select.filter(Column::Status.eq(status.label()));
        }

        if let Some(user_id) = filter.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        if let Some(mode) = filter.mode.as_deref().filter(|s| !s.trim().is_empty()) {
            let mode = mode
                .trim()
                .parse::<AllocationMode>()
                .map_err(TeachAllocError::validation)?;
            select = select.filter(Column::Mode.eq(mode.to_string()));
        }

        select = select.order_by_asc(Column::Id);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }

        let models = select
            .all(&self.db)
            .await
            .map_err(db_error("查询分配列表失败"))?;

        load_rows(&self.db, models).await
    }

    /// 获取单个分配行
    pub async fn get_allocation_row_impl(&self, id: i64) -> Result<Option<AllocationRow>> {
        let Some(model) = Allocations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询分配失败"))?
        else {
            return Ok(None);
        };

        Ok(load_rows(&self.db, vec![model]).await?.into_iter().next())
    }

    /// 编辑分配并按传播意图修改其他周的课次
    ///
    /// 全部写操作在同一事务内完成，任一步失败都不会留下部分修改。
    pub async fn update_allocation_impl(
        &self,
        id: i64,
        edit: AllocationEdit,
    ) -> Result<Option<AllocationUpdate>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(allocation) = Allocations::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询分配失败"))?
        else {
            return Ok(None);
        };

        let occurrence = match allocation.occurrence_id {
            Some(occurrence_id) => SessionOccurrences::find_by_id(occurrence_id)
                .one(&txn)
                .await
                .map_err(db_error("查询课次失败"))?,
            None => None,
        };

        check_edit_against_mode(&edit, occurrence.is_some())?;
        check_references(&txn, &edit).await?;

        let now = chrono::Utc::now().timestamp();
        let owning_activity = occurrence
            .as_ref()
            .map(|o| o.activity_id)
            .unwrap_or(allocation.activity_id);

        // 分配自身字段：缺省即不修改
        let mut active: AllocationActiveModel = allocation.clone().into();
        if let Some(user_id) = edit.user_id {
            active.user_id = Set(Some(user_id));
        }
        if let Some(paycode) = &edit.paycode_id {
            active.paycode_id = Set(Some(paycode.clone()));
        }
        if let Some(status) = edit.status {
            active.status = Set(status.label().to_string());
        }
        if let Some(hours) = edit.hours {
            active.hours = Set(Some(hours));
        }
        if active.is_changed() {
            active.updated_at = Set(now);
            active.update(&txn).await.map_err(db_error("更新分配失败"))?;
        }

        // 当前课次：时间三元组、地点、备注（备注直接覆盖）
        if let Some(occ) = occurrence {
            let mut active: OccurrenceActiveModel = occ.into();
            if let Some(schedule) = edit.schedule {
                active.session_date = Set(Some(schedule.session_date));
                active.start_at = Set(Some(schedule.start_at));
                active.end_at = Set(Some(schedule.end_at));
            }
            if let Some(location) = &edit.location {
                active.location = Set(Some(location.clone()));
            }
            if let Some(note) = &edit.note {
                active.note = Set(Some(note.clone()));
            }
            if active.is_changed() {
                active.update(&txn).await.map_err(db_error("更新课次失败"))?;
            }
        }

        let mut dropped_occurrence_ids = Vec::new();
        if !edit.propagation.is_noop() {
            let requested = &edit.propagation.occurrence_ids;
            let mut targets = SessionOccurrences::find()
                .filter(session_occurrences::Column::ActivityId.eq(owning_activity))
                .filter(session_occurrences::Column::Id.is_in(requested.clone()))
                .all(&txn)
                .await
                .map_err(db_error("查询传播目标课次失败"))?;
            targets.sort_by_key(|o| {
                (
                    o.session_date.is_none(),
                    o.session_date,
                    o.start_at.is_none(),
                    o.start_at,
                    o.id,
                )
            });

            dropped_occurrence_ids = requested
                .iter()
                .copied()
                .filter(|rid| !targets.iter().any(|t| t.id == *rid))
                .collect();
            if !dropped_occurrence_ids.is_empty() {
                warn!(
                    "分配 {} 的传播目标不属于教学活动 {}，已忽略: {:?}",
                    id, owning_activity, dropped_occurrence_ids
                );
            }

            for target in targets {
                propagate_to_occurrence(&txn, target, &edit, now).await?;
            }
        }

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        info!(
            "分配 {} 已更新，传播课次 {} 个",
            id,
            edit.propagation.occurrence_ids.len() - dropped_occurrence_ids.len()
        );

        let row = self
            .get_allocation_row_impl(id)
            .await?
            .ok_or_else(|| TeachAllocError::not_found(format!("Allocation {id} not found")))?;

        Ok(Some(AllocationUpdate {
            row,
            dropped_occurrence_ids,
        }))
    }

    /// 创建未排课分配
    ///
    /// 在开课下查找或创建对应类型的未排课教学活动，再插入不绑定课次的分配。
    pub async fn create_unscheduled_allocation_impl(
        &self,
        req: CreateUnscheduledRequest,
    ) -> Result<AllocationRow> {
        let activity_type = req.activity_type();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        if UnitOfferings::find_by_id(req.offering_id)
            .one(&txn)
            .await
            .map_err(db_error("查询开课失败"))?
            .is_none()
        {
            return Err(TeachAllocError::not_found(format!(
                "Unit offering {} not found",
                req.offering_id
            )));
        }

        if Users::find_by_id(req.user_id)
            .one(&txn)
            .await
            .map_err(db_error("查询用户失败"))?
            .is_none()
        {
            return Err(TeachAllocError::not_found(format!(
                "User {} not found",
                req.user_id
            )));
        }

        let existing = TeachingActivities::find()
            .filter(teaching_activities::Column::OfferingId.eq(req.offering_id))
            .filter(teaching_activities::Column::ActivityType.eq(activity_type.as_str()))
            .filter(teaching_activities::Column::Mode.eq(AllocationMode::UNSCHEDULED))
            .one(&txn)
            .await
            .map_err(db_error("查询教学活动失败"))?;

        let activity = match existing {
            Some(activity) => activity,
            None => ActivityActiveModel {
                offering_id: Set(req.offering_id),
                activity_type: Set(activity_type.clone()),
                activity_name: Set(format!("Manual {activity_type}")),
                mode: Set(AllocationMode::UNSCHEDULED.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("创建教学活动失败"))?,
        };

        let code = paycode_for_activity_type(&activity_type);
        let paycode_id = Paycodes::find_by_id(code.to_string())
            .one(&txn)
            .await
            .map_err(db_error("查询薪酬代码失败"))?
            .map(|p| p.code);
        if paycode_id.is_none() {
            warn!("薪酬代码 {} 不存在，未排课分配不设置薪酬代码", code);
        }

        let now = chrono::Utc::now().timestamp();
        let inserted = AllocationActiveModel {
            user_id: Set(Some(req.user_id)),
            occurrence_id: Set(None),
            activity_id: Set(activity.id),
            paycode_id: Set(paycode_id),
            status: Set(AllocationStatus::Pending.label().to_string()),
            teaching_role: Set(Some(UNSCHEDULED_TEACHING_ROLE.to_string())),
            hours: Set(Some(req.hours)),
            note: Set(req.note.filter(|n| !n.trim().is_empty())),
            mode: Set(AllocationMode::UNSCHEDULED.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("创建未排课分配失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        info!(
            "已创建未排课分配 {}（活动 {}，{} 小时）",
            inserted.id, activity.id, req.hours
        );

        self.get_allocation_row_impl(inserted.id)
            .await?
            .ok_or_else(|| {
                TeachAllocError::not_found(format!("Allocation {} not found", inserted.id))
            })
    }

    /// 同单元、同活动类型、由其他导师承担的分配
    pub async fn list_swap_candidates_impl(
        &self,
        allocation: &AllocationRow,
    ) -> Result<Vec<AllocationRow>> {
        let (Some(unit_code), Some(activity_type)) =
            (allocation.unit_code.clone(), allocation.activity_type.clone())
        else {
            return Ok(Vec::new());
        };

        let filter = AllocationFilter {
            unit_code: Some(unit_code),
            activity_type: Some(activity_type),
            ..Default::default()
        };

        let mut rows = self.list_allocation_rows_impl(&filter, None).await?;
        rows.retain(|row| {
            row.id != allocation.id && row.user_id.is_some() && row.user_id != allocation.user_id
        });

        Ok(rows)
    }
}

/// 排课相关字段只能用于绑定课次的分配，手工工时只能用于未排课分配
fn check_edit_against_mode(edit: &AllocationEdit, scheduled: bool) -> Result<()> {
    if !scheduled {
        if edit.schedule.is_some() {
            return Err(TeachAllocError::validation(
                "cannot set schedule on an unscheduled allocation",
            ));
        }
        if edit.location.is_some() {
            return Err(TeachAllocError::validation(
                "cannot set location on an unscheduled allocation",
            ));
        }
        if edit.note.is_some() {
            return Err(TeachAllocError::validation(
                "cannot set note on an unscheduled allocation",
            ));
        }
    } else if edit.hours.is_some() {
        return Err(TeachAllocError::validation(
            "cannot set hours on a scheduled allocation; hours derive from the session times",
        ));
    }
    Ok(())
}

/// 导师与薪酬代码必须已存在
async fn check_references<C: ConnectionTrait>(db: &C, edit: &AllocationEdit) -> Result<()> {
    if let Some(user_id) = edit.user_id {
        let user = Users::find_by_id(user_id)
            .one(db)
            .await
            .map_err(db_error("查询用户失败"))?;
        if user.is_none() {
            return Err(TeachAllocError::validation(format!(
                "user_id {user_id} does not reference an existing user"
            )));
        }
    }
    if let Some(code) = &edit.paycode_id {
        let paycode = Paycodes::find_by_id(code.clone())
            .one(db)
            .await
            .map_err(db_error("查询薪酬代码失败"))?;
        if paycode.is_none() {
            return Err(TeachAllocError::validation(format!("unknown paycode_id: {code}")));
        }
    }
    Ok(())
}

/// 把编辑内容传播到一个目标课次及其关联的全部分配
async fn propagate_to_occurrence<C: ConnectionTrait>(
    db: &C,
    target: OccurrenceModel,
    edit: &AllocationEdit,
    now: i64,
) -> Result<()> {
    let intent = &edit.propagation;
    let target_id = target.id;

    let shifted_date = match (intent.dow, target.session_date) {
        (Some(dow), Some(date)) => Some(shift_to_weekday(date, dow)),
        _ => None,
    };
    let start = edit
        .schedule
        .filter(|_| intent.has(PropagateField::Start))
        .map(|s| s.start_at);
    let end = edit
        .schedule
        .filter(|_| intent.has(PropagateField::End))
        .map(|s| s.end_at);
    let location = edit
        .location
        .as_ref()
        .filter(|_| intent.has(PropagateField::Location));
    let note = edit.note.as_ref().filter(|_| intent.has(PropagateField::Note));

    let existing_note = target.note.clone();
    let mut active: OccurrenceActiveModel = target.into();
    if let Some(date) = shifted_date {
        active.session_date = Set(Some(date));
    }
    if let Some(start) = start {
        active.start_at = Set(Some(start));
    }
    if let Some(end) = end {
        active.end_at = Set(Some(end));
    }
    if let Some(location) = location {
        active.location = Set(Some(location.clone()));
    }
    if let Some(note) = note {
        active.note = Set(Some(merge_note(
            existing_note.as_deref(),
            note,
            intent.notes_mode,
        )));
    }
    if active.is_changed() {
        active
            .update(db)
            .await
            .map_err(db_error("传播课次字段失败"))?;
    }

    // 目标课次上的全部分配
    let mut patch = <AllocationActiveModel as Default>::default();
    if let Some(user_id) = edit.user_id.filter(|_| intent.has(PropagateField::Tutor)) {
        patch.user_id = Set(Some(user_id));
    }
    if let Some(code) = edit
        .paycode_id
        .as_ref()
        .filter(|_| intent.has(PropagateField::Paycode))
    {
        patch.paycode_id = Set(Some(code.clone()));
    }
    if let Some(status) = edit.status.filter(|_| intent.has(PropagateField::Status)) {
        patch.status = Set(status.label().to_string());
    }
    if patch.is_changed() {
        patch.updated_at = Set(now);
        let result = Allocations::update_many()
            .set(patch)
            .filter(Column::OccurrenceId.eq(target_id))
            .exec(db)
            .await
            .map_err(db_error("传播分配字段失败"))?;
        debug!(
            "课次 {} 上的 {} 条分配已同步",
            target_id, result.rows_affected
        );
    }

    Ok(())
}

/// 单元代码、活动类型对应的教学活动 ID
async fn find_activity_ids<C: ConnectionTrait>(
    db: &C,
    unit_code: Option<&str>,
    activity_type: Option<&str>,
) -> Result<Vec<i64>> {
    let mut select = TeachingActivities::find()
        .select_only()
        .column(teaching_activities::Column::Id);

    if let Some(unit_code) = unit_code {
        select = select
            .join(
                JoinType::InnerJoin,
                teaching_activities::Relation::UnitOffering.def(),
            )
            .filter(unit_offerings::Column::UnitCode.eq(unit_code));
    }
    if let Some(activity_type) = activity_type {
        select = select.filter(teaching_activities::Column::ActivityType.eq(activity_type));
    }

    select
        .into_tuple()
        .all(db)
        .await
        .map_err(db_error("查询教学活动失败"))
}

/// 批量加载关联数据并组装反规范化的分配行，保持输入顺序
async fn load_rows<C: ConnectionTrait>(
    db: &C,
    models: Vec<AllocationModel>,
) -> Result<Vec<AllocationRow>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let occurrence_ids: Vec<i64> = models.iter().filter_map(|m| m.occurrence_id).collect();
    let occurrences: HashMap<i64, OccurrenceModel> = if occurrence_ids.is_empty() {
        HashMap::new()
    } else {
        SessionOccurrences::find()
            .filter(session_occurrences::Column::Id.is_in(occurrence_ids))
            .all(db)
            .await
            .map_err(db_error("查询课次失败"))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect()
    };

    let owning_activity = |m: &AllocationModel| {
        m.occurrence_id
            .and_then(|oid| occurrences.get(&oid))
            .map(|o| o.activity_id)
            .unwrap_or(m.activity_id)
    };

    let activity_ids: Vec<i64> = models.iter().map(owning_activity).collect();
    let activities: HashMap<i64, ActivityModel> = TeachingActivities::find()
        .filter(teaching_activities::Column::Id.is_in(activity_ids))
        .all(db)
        .await
        .map_err(db_error("查询教学活动失败"))?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let offering_ids: Vec<i64> = activities.values().map(|a| a.offering_id).collect();
    let offerings: HashMap<i64, UnitOfferingModel> = if offering_ids.is_empty() {
        HashMap::new()
    } else {
        UnitOfferings::find()
            .filter(unit_offerings::Column::Id.is_in(offering_ids))
            .all(db)
            .await
            .map_err(db_error("查询开课失败"))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect()
    };

    let unit_codes: Vec<String> = offerings.values().map(|o| o.unit_code.clone()).collect();
    let units: HashMap<String, CourseUnitModel> = if unit_codes.is_empty() {
        HashMap::new()
    } else {
        CourseUnits::find()
            .filter(crate::entity::course_units::Column::UnitCode.is_in(unit_codes))
            .all(db)
            .await
            .map_err(db_error("查询课程单元失败"))?
            .into_iter()
            .map(|m| (m.unit_code.clone(), m))
            .collect()
    };

    let user_ids: Vec<i64> = models.iter().filter_map(|m| m.user_id).collect();
    let users: HashMap<i64, UserModel> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(crate::entity::users::Column::Id.is_in(user_ids))
            .all(db)
            .await
            .map_err(db_error("查询导师失败"))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect()
    };

    let rows = models
        .into_iter()
        .map(|model| {
            let activity_id = owning_activity(&model);
            let occurrence = model.occurrence_id.and_then(|oid| occurrences.get(&oid));
            let activity = activities.get(&activity_id);
            let offering = activity.and_then(|a| offerings.get(&a.offering_id));
            let unit = offering.and_then(|o| units.get(&o.unit_code));
            let user = model.user_id.and_then(|uid| users.get(&uid));
            build_row(model, activity_id, occurrence, activity, offering, unit, user)
        })
        .collect();

    Ok(rows)
}

fn build_row(
    model: allocations::Model,
    activity_id: i64,
    occurrence: Option<&OccurrenceModel>,
    activity: Option<&ActivityModel>,
    offering: Option<&UnitOfferingModel>,
    unit: Option<&CourseUnitModel>,
    user: Option<&UserModel>,
) -> AllocationRow {
    let mode = model.mode.parse::<AllocationMode>().unwrap_or(if occurrence.is_some() {
        AllocationMode::Scheduled
    } else {
        AllocationMode::Unscheduled
    });

    let status = model.status.parse::<AllocationStatus>().unwrap_or_else(|_| {
        warn!("分配 {} 的状态 {:?} 无法识别，按 Pending 处理", model.id, model.status);
        AllocationStatus::Pending
    });

    let (session_date, start_at, end_at, location) = match occurrence {
        Some(o) => (o.session_date, o.start_at, o.end_at, o.location.clone()),
        None => (None, None, None, None),
    };

    // 排课分配的备注与工时来自课次
    let (note, hours) = match mode {
        AllocationMode::Scheduled => (
            occurrence.and_then(|o| o.note.clone()),
            derived_hours(start_at, end_at),
        ),
        AllocationMode::Unscheduled => (model.note, model.hours),
    };

    AllocationRow {
        id: model.id,
        user_id: model.user_id,
        first_name: user.map(|u| u.first_name.clone()),
        last_name: user.map(|u| u.last_name.clone()),
        email: user.map(|u| u.email.clone()),
        unit_code: offering.map(|o| o.unit_code.clone()),
        unit_name: unit.map(|u| u.unit_name.clone()),
        offering_id: activity.map(|a| a.offering_id),
        activity_id,
        activity_type: activity.map(|a| a.activity_type.clone()),
        activity_name: activity.map(|a| a.activity_name.clone()),
        occurrence_id: model.occurrence_id,
        session_date,
        start_at,
        end_at,
        location,
        note,
        status,
        simplified_status: status.simplified(),
        paycode_id: model.paycode_id,
        teaching_role: model.teaching_role,
        mode,
        hours,
    }
}
