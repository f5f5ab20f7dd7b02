// ==========================================
// 卡牌评级工坊排班系统 - 时段落位
// ==========================================
// 职责: 计算员工下一项任务的开始时间
// 规则:
// 1) 本次运行无历史任务 → 排班日期 + 上班时间
// 2) 否则候选开始 = 上一项结束 + 间隔
// 3) 候选开始与结束均落在同一天且不晚于下班时间 → 采用
// 4) 否则顺延到候选开始次日的上班时间（不拆分任务）
// ==========================================
// 红线: 每天都是工作日（不建模周末/节假日）
// 红线: 只有开始落位会触发顺延; 超长任务可越过下班时间
// ==========================================

use crate::config::PlanningConfig;
use crate::engine::error::{PlanningError, PlanningResult};
use crate::engine::workload::WorkloadState;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlotPlanner {
    workday_start: NaiveTime,
    workday_end: NaiveTime,
    break_minutes: i64,
}

impl TimeSlotPlanner {
    /// 创建时段规划器
    ///
    /// # 错误
    /// - 上班时间不早于下班时间
    /// - 间隔为负数或超出范围
    pub fn new(workday_start: NaiveTime, workday_end: NaiveTime, break_minutes: i64) -> PlanningResult<Self> {
        if workday_start >= workday_end {
            return Err(PlanningError::InvalidConfig(format!(
                "上班时间 {} 必须早于下班时间 {}",
                workday_start, workday_end
            )));
        }
        if break_minutes < 0 || TimeDelta::try_minutes(break_minutes).is_none() {
            return Err(PlanningError::InvalidConfig(format!(
                "任务间隔必须为非负且在可表示范围内: {}",
                break_minutes
            )));
        }

        Ok(Self {
            workday_start,
            workday_end,
            break_minutes,
        })
    }

    pub fn from_config(config: &PlanningConfig) -> PlanningResult<Self> {
        Self::new(config.workday_start, config.workday_end, config.break_minutes)
    }

    /// 计算下一项任务的开始时间
    ///
    /// # 参数
    /// - `state`: 员工当前负载
    /// - `plan_date`: 排班日期
    /// - `duration_minutes`: 任务时长
    ///
    /// # 返回
    /// 时间超出可表示范围时返回 None
    pub fn next_start(&self, state: &WorkloadState, plan_date: NaiveDate, duration_minutes: i64) -> Option<NaiveDateTime> {
        let prev_end = match state.last_end_at {
            None => return Some(plan_date.and_time(self.workday_start)),
            Some(end) => end,
        };

        let mut candidate = prev_end.checked_add_signed(TimeDelta::try_minutes(self.break_minutes)?)?;

        // 上一项越过午夜时, 候选开始可能早于当天上班时间
        let day_open = candidate.date().and_time(self.workday_start);
        if candidate < day_open {
            candidate = day_open;
        }

        let candidate_end = candidate.checked_add_signed(TimeDelta::try_minutes(duration_minutes)?)?;
        let day_close = candidate.date().and_time(self.workday_end);

        if candidate_end.date() == candidate.date() && candidate <= day_close && candidate_end <= day_close {
            return Some(candidate);
        }

        self.next_day_open(candidate.date())
    }

    /// 次日上班时间
    fn next_day_open(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.succ_opt().map(|next| next.and_time(self.workday_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmployeeProfile;

    fn planner() -> TimeSlotPlanner {
        TimeSlotPlanner::from_config(&PlanningConfig::default()).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 14).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    fn state_ending_at(end: Option<NaiveDateTime>) -> WorkloadState {
        let mut state = WorkloadState::new(
            EmployeeProfile {
                employee_id: "E1".to_string(),
                display_name: "E1".to_string(),
                work_hours_per_day: 8,
                is_active: true,
            },
            date(),
        );
        state.last_end_at = end;
        state
    }

    #[test]
    fn test_first_task_starts_at_workday_start() {
        let start = planner().next_start(&state_ending_at(None), date(), 30).unwrap();
        assert_eq!(start, at(date(), 9, 0));
    }

    #[test]
    fn test_next_task_after_break() {
        let start = planner().next_start(&state_ending_at(Some(at(date(), 9, 12))), date(), 18).unwrap();
        assert_eq!(start, at(date(), 9, 17));
    }

    #[test]
    fn test_task_ending_exactly_at_close_fits() {
        // 17:40 + 5 = 17:45, +15 = 18:00
        let start = planner().next_start(&state_ending_at(Some(at(date(), 17, 40))), date(), 15).unwrap();
        assert_eq!(start, at(date(), 17, 45));
    }

    #[test]
    fn test_rollover_when_end_passes_close() {
        let start = planner().next_start(&state_ending_at(Some(at(date(), 17, 40))), date(), 16).unwrap();
        assert_eq!(start, at(date().succ_opt().unwrap(), 9, 0));
    }

    #[test]
    fn test_rollover_when_candidate_start_passes_close() {
        let start = planner().next_start(&state_ending_at(Some(at(date(), 17, 58))), date(), 1).unwrap();
        assert_eq!(start, at(date().succ_opt().unwrap(), 9, 0));
    }

    #[test]
    fn test_long_task_on_rolled_day_is_not_split() {
        let planner = planner();
        let next_day = date().succ_opt().unwrap();

        // 首项超长任务仍从上班时间开始, 不触发顺延
        let start = planner.next_start(&state_ending_at(None), date(), 600).unwrap();
        assert_eq!(start, at(date(), 9, 0));

        // 顺延后的开始不再检查结束时间
        let start = planner.next_start(&state_ending_at(Some(at(date(), 17, 0))), date(), 600).unwrap();
        assert_eq!(start, at(next_day, 9, 0));
    }

    #[test]
    fn test_start_after_midnight_overflow_moves_to_day_open() {
        let next_day = date().succ_opt().unwrap();
        let start = planner().next_start(&state_ending_at(Some(at(next_day, 1, 0))), date(), 10).unwrap();
        assert_eq!(start, at(next_day, 9, 0));
    }

    #[test]
    fn test_invalid_hours_rejected() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(matches!(
            TimeSlotPlanner::new(nine, nine, 5),
            Err(PlanningError::InvalidConfig(_))
        ));
        assert!(TimeSlotPlanner::new(nine, NaiveTime::from_hms_opt(10, 0, 0).unwrap(), -1).is_err());
        assert!(TimeSlotPlanner::new(nine, NaiveTime::from_hms_opt(10, 0, 0).unwrap(), i64::MAX).is_err());
    }

    #[test]
    fn test_unrepresentable_times_yield_none() {
        let planner = planner();
        let state = state_ending_at(Some(at(date(), 9, 0)));
        assert_eq!(planner.next_start(&state, date(), i64::MAX), None);

        let state = state_ending_at(Some(NaiveDateTime::MAX));
        assert_eq!(planner.next_start(&state, date(), 1), None);
    }
}
