// ==========================================
// 卡牌评级工坊排班系统 - 排班运行报告
// ==========================================
// 用途: 供报表层/命令行消费的结构化结果（可序列化为 JSON）
// 红线: 无论成功、部分失败还是全部失败, 编排器都返回报告
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::Stage;
use crate::engine::workload::WorkloadState;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

// ==========================================
// 单工单结果
// ==========================================

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// 按张计时阶段, 卡牌数为空或 0
    NoCards,
    /// 工单所处阶段与本次排班阶段不一致
    StageMismatch,
    /// 时长或结束时间超出可表示范围
    DurationOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub work_item_id: String,
    pub reason: SkipReason,
}

/// 落库失败（本次运行内不重试）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub work_item_id: String,
    pub employee_id: String,
    pub error: String,
}

// ==========================================
// 员工负载汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeWorkloadSummary {
    pub employee_id: String,
    pub employee_name: String,
    pub assigned_count: usize,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub utilization_pct: f64,
    /// 负载率 > 100%
    pub saturated: bool,
}

impl From<&WorkloadState> for EmployeeWorkloadSummary {
    fn from(state: &WorkloadState) -> Self {
        let utilization_pct = state.workload_percentage();
        Self {
            employee_id: state.employee.employee_id.clone(),
            employee_name: state.employee.display_name.clone(),
            assigned_count: state.assigned_count,
            total_minutes: state.assigned_minutes,
            total_hours: state.assigned_minutes as f64 / 60.0,
            utilization_pct,
            saturated: utilization_pct > 100.0,
        }
    }
}

// ==========================================
// 阶段结果
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageOutcome {
    /// 全部工单已处理
    Completed,
    /// 截止时间已到, 处理到一半停止
    Interrupted,
    /// 前序阶段中止, 本阶段未开始
    NotStarted,
    /// 配置错误（如无可用员工）, 整阶段中止, 运行继续
    ConfigurationError { message: String },
    /// 数据访问等系统错误, 整阶段中止, 运行标记失败
    SystemError { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub role: &'static str,
    pub outcome: StageOutcome,
    pub pending_count: usize,
    pub planned_count: usize,
    /// 已排工单按时效等级展示名计数
    pub planned_by_delay: BTreeMap<&'static str, usize>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
    /// 截止时间到达时尚未处理的工单
    pub unprocessed: Vec<String>,
    pub workloads: Vec<EmployeeWorkloadSummary>,
}

impl StageReport {
    /// 未执行或中止阶段的空报告
    pub fn empty(stage: Stage, outcome: StageOutcome, pending_count: usize) -> Self {
        Self {
            stage,
            role: stage.role(),
            outcome,
            pending_count,
            planned_count: 0,
            planned_by_delay: BTreeMap::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            unprocessed: Vec::new(),
            workloads: Vec::new(),
        }
    }
}

// ==========================================
// 运行报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningReport {
    pub success: bool,
    pub message: String,
    pub plan_date: NaiveDate,
    pub cleared_entries: usize,
    pub planned_by_stage: BTreeMap<Stage, usize>,
    pub total_planned: usize,
    pub stages: Vec<StageReport>,
    /// 本次运行实际使用的排班参数（读取失败时为空）
    pub config: Option<PlanningConfig>,
}

impl PlanningReport {
    /// 由阶段报告汇总
    pub fn from_stages(plan_date: NaiveDate, cleared_entries: usize, stages: Vec<StageReport>) -> Self {
        let planned_by_stage: BTreeMap<Stage, usize> =
            stages.iter().map(|s| (s.stage, s.planned_count)).collect();
        let total_planned = planned_by_stage.values().sum();

        let system_failures: Vec<String> = stages
            .iter()
            .filter_map(|s| match &s.outcome {
                StageOutcome::SystemError { message } => Some(format!("{}: {}", s.stage, message)),
                _ => None,
            })
            .collect();
        let config_failures: Vec<String> = stages
            .iter()
            .filter_map(|s| match &s.outcome {
                StageOutcome::ConfigurationError { message } => Some(format!("{}: {}", s.stage, message)),
                _ => None,
            })
            .collect();
        let interrupted = stages
            .iter()
            .any(|s| matches!(s.outcome, StageOutcome::Interrupted | StageOutcome::NotStarted));

        let success = system_failures.is_empty() && !interrupted;

        let mut message = if success {
            format!("排班完成, 共排入 {} 个工单", total_planned)
        } else if !system_failures.is_empty() {
            format!(
                "排班中止, 已排入 {} 个工单; 系统错误: {}",
                total_planned,
                system_failures.join("; ")
            )
        } else {
            format!("排班因截止时间中断, 已排入 {} 个工单", total_planned)
        };
        if !config_failures.is_empty() {
            message.push_str(&format!("; 配置错误: {}", config_failures.join("; ")));
        }

        Self {
            success,
            message,
            plan_date,
            cleared_entries,
            planned_by_stage,
            total_planned,
            stages,
            config: None,
        }
    }

    /// 附带本次运行的排班参数
    pub fn with_config(mut self, config: PlanningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 运行开始前即失败（配置读取/清理失败）
    pub fn failed(plan_date: NaiveDate, message: String) -> Self {
        Self {
            success: false,
            message,
            plan_date,
            cleared_entries: 0,
            planned_by_stage: BTreeMap::new(),
            total_planned: 0,
            stages: Vec::new(),
            config: None,
        }
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn completed(stage: Stage, planned: usize) -> StageReport {
        let mut report = StageReport::empty(stage, StageOutcome::Completed, planned);
        report.planned_count = planned;
        report
    }

    #[test]
    fn test_configuration_error_keeps_success() {
        let report = PlanningReport::from_stages(
            date(),
            0,
            vec![
                StageReport::empty(
                    Stage::Grading,
                    StageOutcome::ConfigurationError {
                        message: "no graders".to_string(),
                    },
                    1,
                ),
                completed(Stage::Scanning, 3),
            ],
        );

        assert!(report.success);
        assert_eq!(report.total_planned, 3);
        assert_eq!(report.planned_by_stage[&Stage::Grading], 0);
        assert!(report.message.contains("no graders"));
    }

    #[test]
    fn test_system_error_marks_run_failed() {
        let report = PlanningReport::from_stages(
            date(),
            2,
            vec![
                completed(Stage::Grading, 2),
                StageReport::empty(
                    Stage::Certification,
                    StageOutcome::SystemError {
                        message: "db down".to_string(),
                    },
                    0,
                ),
            ],
        );

        assert!(!report.success);
        assert_eq!(report.total_planned, 2);
        assert!(report.message.contains("db down"));
    }

    #[test]
    fn test_report_serializes_stage_keys() {
        let mut stage = completed(Stage::Preparation, 1);
        stage.planned_by_delay.insert("Express", 1);
        let report = PlanningReport::from_stages(date(), 0, vec![stage])
            .with_config(PlanningConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["planned_by_stage"]["PREPARATION"], 1);
        assert_eq!(json["stages"][0]["outcome"]["status"], "COMPLETED");
        assert_eq!(json["stages"][0]["planned_by_delay"]["Express"], 1);
        assert_eq!(json["config"]["minutes_per_card"], 3);
    }
}
