// ==========================================
// 卡牌评级工坊排班系统 - 排班明细领域模型
// ==========================================
// 红线: end_at = start_at + duration_minutes, 精确相等
// 红线: 创建后排班核心不再修改
// ==========================================

use crate::domain::types::{DelayCode, Stage};
use crate::domain::work_item::WorkItem;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ScheduleEntry - 排班明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub entry_id: String,          // 明细ID (UUID v4)
    pub work_item_id: String,      // 关联工单
    pub employee_id: String,       // 负责员工
    pub plan_date: NaiveDate,      // 排班日期
    pub start_at: NaiveDateTime,   // 开始时间
    pub end_at: NaiveDateTime,     // 结束时间
    pub duration_minutes: i64,     // 时长（分钟）
    pub stage: Stage,              // 工序阶段 (状态码)
    pub delay_code: DelayCode,     // 时效等级
    pub card_count: u32,           // 卡牌数量
}

impl ScheduleEntry {
    /// 为工单生成一条新明细
    ///
    /// end_at 总是由 start_at 和时长推导，不接受外部传入
    ///
    /// # 返回
    /// 时长或结束时间超出可表示范围时返回 None
    pub fn new(
        item: &WorkItem,
        employee_id: &str,
        plan_date: NaiveDate,
        start_at: NaiveDateTime,
        duration_minutes: i64,
    ) -> Option<Self> {
        let end_at = TimeDelta::try_minutes(duration_minutes)
            .and_then(|duration| start_at.checked_add_signed(duration))?;

        Some(Self {
            entry_id: Uuid::new_v4().to_string(),
            work_item_id: item.work_item_id.clone(),
            employee_id: employee_id.to_string(),
            plan_date,
            start_at,
            end_at,
            duration_minutes,
            stage: item.stage,
            delay_code: item.delay(),
            card_count: item.card_count.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> WorkItem {
        WorkItem {
            work_item_id: "WI-1".to_string(),
            order_label: None,
            card_count: None,
            delay_code: Some("x".to_string()),
            stage: Stage::Scanning,
            submitted_on: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        }
    }

    #[test]
    fn test_end_derived_from_start_and_duration() {
        let item = item();
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(17, 58, 0)
            .unwrap();

        let entry = ScheduleEntry::new(&item, "EMP-1", start.date(), start, 5).unwrap();

        assert_eq!(entry.end_at - entry.start_at, TimeDelta::minutes(5));
        assert_eq!(entry.delay_code, DelayCode::Express);
        assert_eq!(entry.card_count, 0);
        assert_eq!(entry.stage, Stage::Scanning);
        assert!(Uuid::parse_str(&entry.entry_id).is_ok());
    }

    #[test]
    fn test_unrepresentable_end_yields_none() {
        let item = item();
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        assert!(ScheduleEntry::new(&item, "EMP-1", start.date(), start, i64::MAX).is_none());
        assert!(ScheduleEntry::new(&item, "EMP-1", start.date(), NaiveDateTime::MAX, 1).is_none());
    }
}
