// ==========================================
// 卡牌评级工坊排班系统 - 阶段分配引擎
// ==========================================
// 职责: 单阶段工单队列 → 员工排班明细（贪心, 最少负载优先）
// 输入: 阶段工单 + 该阶段员工负载池 + 排班日期
// 输出: 已落库明细 + 跳过/失败清单 + 负载快照
// ==========================================
// 红线: 工单严格按优先级顺序逐个处理（每次选择依赖上一次更新后的负载）
// 红线: 有工单无员工 → 整阶段中止（配置错误）, 不逐单跳过
// 红线: 落库失败不更新负载, 本次运行不重试
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::{ScheduleEntry, Stage, WorkItem};
use crate::engine::duration::DurationRule;
use crate::engine::error::{PlanningError, PlanningResult};
use crate::engine::ports::ScheduleEntrySink;
use crate::engine::priority::PriorityClassifier;
use crate::engine::report::{FailedItem, SkipReason, SkippedItem};
use crate::engine::time_slot::TimeSlotPlanner;
use crate::engine::workload::{WorkloadState, WorkloadTracker};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// 单阶段分配结果
#[derive(Debug, Clone)]
pub struct StageAssignment {
    pub stage: Stage,
    pub planned: Vec<ScheduleEntry>,
    /// 已排工单按时效等级展示名计数
    pub planned_by_delay: BTreeMap<&'static str, usize>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
    /// 截止时间到达后未处理的工单
    pub unprocessed: Vec<String>,
    pub interrupted: bool,
    /// 结束时每名员工的负载快照
    pub workloads: Vec<WorkloadState>,
}

impl StageAssignment {
    pub fn planned_count(&self) -> usize {
        self.planned.len()
    }
}

// ==========================================
// StageAssignmentEngine - 阶段分配引擎
// ==========================================
pub struct StageAssignmentEngine {
    classifier: PriorityClassifier,
    planner: TimeSlotPlanner,
    config: PlanningConfig,
}

impl StageAssignmentEngine {
    /// 构造函数
    ///
    /// # 错误
    /// - 工作时段配置无效
    /// - 单卡工时/扫描每单工时 非正或超出范围
    pub fn new(config: &PlanningConfig) -> PlanningResult<Self> {
        for stage in [Stage::Grading, Stage::Scanning] {
            DurationRule::for_stage(stage, config).validate()?;
        }

        Ok(Self {
            classifier: PriorityClassifier::new(),
            planner: TimeSlotPlanner::from_config(config)?,
            config: config.clone(),
        })
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行单阶段分配
    ///
    /// 规则:
    /// 1) 队列按 时效rank → 提交日期 → 到达顺序 稳定排序
    /// 2) 按阶段工时策略计算时长; 按张计时且无卡牌 → 跳过
    /// 3) 选择当前累计分钟最少的员工（同负载取靠前者）
    /// 4) 时段落位, 结束 = 开始 + 时长
    /// 5) 落库成功才记入负载; 失败记入失败清单
    ///
    /// # 参数
    /// - `stage`: 排班阶段
    /// - `items`: 该阶段待处理工单（顺序不作要求）
    /// - `tracker`: 该阶段员工负载池（会被修改）
    /// - `plan_date`: 排班日期
    /// - `sink`: 明细落库
    /// - `deadline`: 可选截止时间, 仅在工单之间检查
    ///
    /// # 错误
    /// - `NoEligibleEmployees`: 有待处理工单但负载池为空
    #[instrument(skip_all, fields(
        stage = %stage,
        plan_date = %plan_date,
        items_count = items.len(),
        employees_count = tracker.len()
    ))]
    pub fn assign_stage(
        &self,
        stage: Stage,
        items: Vec<WorkItem>,
        tracker: &mut WorkloadTracker,
        plan_date: NaiveDate,
        sink: &dyn ScheduleEntrySink,
        deadline: Option<Instant>,
    ) -> PlanningResult<StageAssignment> {
        // 0. 前置检查: 有工单无员工 → 整阶段中止
        if tracker.is_empty() && !items.is_empty() {
            return Err(PlanningError::NoEligibleEmployees {
                stage,
                role: stage.role(),
                pending: items.len(),
            });
        }

        let rule = DurationRule::for_stage(stage, &self.config);
        let queue = self.classifier.sort(items);
        let pending = queue.len();

        let mut planned = Vec::new();
        let mut planned_by_delay = BTreeMap::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();
        let mut unprocessed = Vec::new();
        let mut interrupted = false;

        for item in queue {
            // 截止时间只在工单之间检查
            if interrupted || deadline.map_or(false, |d| Instant::now() >= d) {
                if !interrupted {
                    warn!(stage = %stage, planned = planned.len(), "截止时间已到，停止本阶段分配");
                    interrupted = true;
                }
                unprocessed.push(item.work_item_id);
                continue;
            }

            if item.stage != stage {
                warn!(work_item_id = %item.work_item_id, item_stage = %item.stage, "工单阶段不匹配，跳过");
                skipped.push(SkippedItem {
                    work_item_id: item.work_item_id,
                    reason: SkipReason::StageMismatch,
                });
                continue;
            }

            // 1. 时长
            let duration_minutes = match rule.duration_minutes(&item) {
                Ok(minutes) => minutes,
                Err(reason) => {
                    debug!(work_item_id = %item.work_item_id, ?reason, "工单时长不可排，跳过");
                    skipped.push(SkippedItem {
                        work_item_id: item.work_item_id,
                        reason,
                    });
                    continue;
                }
            };

            // 2. 最少负载员工
            let Some(state) = tracker.least_loaded_mut() else {
                return Err(PlanningError::NoEligibleEmployees {
                    stage,
                    role: stage.role(),
                    pending,
                });
            };

            // 3. 时段落位 + 构造明细
            let entry = match self
                .planner
                .next_start(state, plan_date, duration_minutes)
                .and_then(|start_at| {
                    ScheduleEntry::new(&item, &state.employee.employee_id, plan_date, start_at, duration_minutes)
                }) {
                Some(entry) => entry,
                None => {
                    warn!(work_item_id = %item.work_item_id, duration_minutes, "排班时间超出范围，跳过");
                    skipped.push(SkippedItem {
                        work_item_id: item.work_item_id,
                        reason: SkipReason::DurationOutOfRange,
                    });
                    continue;
                }
            };

            // 4. 落库, 成功后才更新负载
            match sink.create_schedule_entry(&entry) {
                Ok(()) => {
                    state.record_assignment(entry.duration_minutes, entry.start_at, entry.end_at);
                    let delay_label = self.classifier.label(item.delay_code.as_deref());
                    *planned_by_delay.entry(delay_label).or_insert(0) += 1;
                    debug!(
                        work_item_id = %entry.work_item_id,
                        employee_id = %entry.employee_id,
                        delay = delay_label,
                        start_at = %entry.start_at,
                        duration_minutes = entry.duration_minutes,
                        "工单已分配"
                    );
                    planned.push(entry);
                }
                Err(e) => {
                    warn!(
                        work_item_id = %entry.work_item_id,
                        employee_id = %entry.employee_id,
                        error = %e,
                        "明细落库失败，本次运行不重试"
                    );
                    failed.push(FailedItem {
                        work_item_id: entry.work_item_id,
                        employee_id: entry.employee_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            planned = planned.len(),
            skipped = skipped.len(),
            failed = failed.len(),
            unprocessed = unprocessed.len(),
            "阶段分配完成"
        );

        Ok(StageAssignment {
            stage,
            planned,
            planned_by_delay,
            skipped,
            failed,
            unprocessed,
            interrupted,
            workloads: tracker.states().to_vec(),
        })
    }
}
