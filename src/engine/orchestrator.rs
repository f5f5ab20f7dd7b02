// ==========================================
// 卡牌评级工坊排班系统 - 排班编排器
// ==========================================
// 用途: 按 评级 → 认证 → 整备 → 扫描 顺序执行各阶段分配, 汇总运行报告
// ==========================================
// 红线: 阶段之间负载池相互独立（同一员工在不同阶段各有一份负载）
// 红线: 任何情况下都返回结构化报告, 不向上抛错
// ==========================================

use crate::config::{PlanningConfig, PlanningConfigReader};
use crate::domain::Stage;
use crate::engine::error::PlanningError;
use crate::engine::ports::PlanningPorts;
use crate::engine::report::{EmployeeWorkloadSummary, PlanningReport, StageOutcome, StageReport};
use crate::engine::stage_assignment::StageAssignmentEngine;
use crate::engine::workload::WorkloadTracker;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

// ==========================================
// PlanningRunOptions - 单次运行选项
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PlanningRunOptions {
    /// 覆盖配置中的“排班前清理当日明细”; None 表示沿用配置
    pub clear_existing: Option<bool>,
    /// 截止时间; 仅在工单之间检查
    pub deadline: Option<Instant>,
}

// ==========================================
// PlanningOrchestrator - 排班编排器
// ==========================================
pub struct PlanningOrchestrator<C>
where
    C: PlanningConfigReader,
{
    config: Arc<C>,
    ports: PlanningPorts,
}

impl<C> PlanningOrchestrator<C>
where
    C: PlanningConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - ports: 员工来源/工单来源/明细落库
    pub fn new(config: Arc<C>, ports: PlanningPorts) -> Self {
        Self { config, ports }
    }

    /// 执行一次完整排班
    ///
    /// # 参数
    /// - plan_date: 排班日期
    /// - options: 运行选项
    ///
    /// # 返回
    /// 运行报告（成功/部分失败/全部失败均返回）
    pub fn run(&self, plan_date: NaiveDate, options: PlanningRunOptions) -> PlanningReport {
        info!(plan_date = %plan_date, "开始执行排班");

        // ==========================================
        // 步骤1: 读取配置快照
        // ==========================================
        let config = match PlanningConfig::load(&*self.config) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "配置读取失败");
                return PlanningReport::failed(plan_date, format!("配置读取失败: {}", e));
            }
        };
        debug!(?config, "配置已加载");

        let engine = match StageAssignmentEngine::new(&config) {
            Ok(engine) => engine,
            Err(e) => {
                error!(error = %e, "排班参数无效");
                return PlanningReport::failed(plan_date, e.to_string());
            }
        };

        // ==========================================
        // 步骤2: 清理当日已有明细（可选）
        // ==========================================
        let clear_existing = options.clear_existing.unwrap_or(config.clear_existing_entries);
        let cleared_entries = if clear_existing {
            match self.ports.sink.clear_schedule_entries_for_date(plan_date) {
                Ok(count) => {
                    info!(cleared = count, "已清理当日排班明细");
                    count
                }
                Err(e) => {
                    error!(error = %e, "清理当日排班明细失败");
                    return PlanningReport::failed(plan_date, format!("清理当日排班明细失败: {}", e));
                }
            }
        } else {
            0
        };

        // ==========================================
        // 步骤3: 逐阶段分配
        // ==========================================
        let mut stages = Vec::with_capacity(Stage::ALL.len());
        let mut halted = false;

        for stage in Stage::ALL {
            if halted {
                stages.push(StageReport::empty(stage, StageOutcome::NotStarted, 0));
                continue;
            }

            let report = self.run_stage(&engine, stage, plan_date, options.deadline);
            if matches!(
                report.outcome,
                StageOutcome::SystemError { .. } | StageOutcome::Interrupted
            ) {
                halted = true;
            }
            stages.push(report);
        }

        // ==========================================
        // 步骤4: 汇总
        // ==========================================
        let report = PlanningReport::from_stages(plan_date, cleared_entries, stages).with_config(config);
        info!(
            success = report.success,
            total_planned = report.total_planned,
            "排班结束: {}",
            report.message
        );
        report
    }

    /// 执行单阶段: 拉取工单与员工, 新建独立负载池, 调用分配引擎
    fn run_stage(
        &self,
        engine: &StageAssignmentEngine,
        stage: Stage,
        plan_date: NaiveDate,
        deadline: Option<Instant>,
    ) -> StageReport {
        if deadline.map_or(false, |d| Instant::now() >= d) {
            warn!(stage = %stage, "截止时间已到，阶段未开始");
            return StageReport::empty(stage, StageOutcome::NotStarted, 0);
        }

        let items = match self.ports.work_items.list_pending_work_items(stage) {
            Ok(items) => items,
            Err(e) => return Self::system_error(stage, 0, PlanningError::from(e)),
        };
        let pending_count = items.len();

        let employees = match self.ports.employees.list_eligible_employees(stage) {
            Ok(employees) => employees,
            Err(e) => return Self::system_error(stage, pending_count, PlanningError::from(e)),
        };

        info!(
            stage = %stage,
            role = stage.role(),
            pending = pending_count,
            employees = employees.len(),
            "开始阶段分配"
        );

        let mut tracker = WorkloadTracker::new(employees, plan_date);
        match engine.assign_stage(
            stage,
            items,
            &mut tracker,
            plan_date,
            self.ports.sink.as_ref(),
            deadline,
        ) {
            Ok(assignment) => StageReport {
                stage,
                role: stage.role(),
                outcome: if assignment.interrupted {
                    StageOutcome::Interrupted
                } else {
                    StageOutcome::Completed
                },
                pending_count,
                planned_count: assignment.planned_count(),
                planned_by_delay: assignment.planned_by_delay,
                skipped: assignment.skipped,
                failed: assignment.failed,
                unprocessed: assignment.unprocessed,
                workloads: assignment
                    .workloads
                    .iter()
                    .map(EmployeeWorkloadSummary::from)
                    .collect(),
            },
            Err(e) if e.is_configuration_error() => {
                warn!(stage = %stage, error = %e, "阶段配置错误，跳过本阶段");
                StageReport::empty(
                    stage,
                    StageOutcome::ConfigurationError { message: e.to_string() },
                    pending_count,
                )
            }
            Err(e) => Self::system_error(stage, pending_count, e),
        }
    }

    fn system_error(stage: Stage, pending_count: usize, e: PlanningError) -> StageReport {
        error!(stage = %stage, error = %e, "阶段执行失败");
        StageReport::empty(
            stage,
            StageOutcome::SystemError { message: e.to_string() },
            pending_count,
        )
    }
}
