// ==========================================
// 卡牌评级工坊排班系统 - 工时口径
// ==========================================
// 按阶段选择工时策略:
// - 评级/认证/整备: 按张计时, 时长 = 卡牌数 × 单卡工时, 无卡牌则跳过
// - 扫描: 每单固定工时, 与卡牌数无关, 从不因卡牌数跳过
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::{Stage, WorkItem};
use crate::engine::error::{PlanningError, PlanningResult};
use crate::engine::report::SkipReason;
use chrono::TimeDelta;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationRule {
    /// 按张计时
    PerUnit { minutes_per_unit: i64 },
    /// 每单固定
    FixedPerOrder { minutes: i64 },
}

impl DurationRule {
    /// 按阶段选取工时策略
    pub fn for_stage(stage: Stage, config: &PlanningConfig) -> Self {
        match stage {
            Stage::Scanning => DurationRule::FixedPerOrder {
                minutes: config.scan_minutes_per_order,
            },
            Stage::Grading | Stage::Certification | Stage::Preparation => DurationRule::PerUnit {
                minutes_per_unit: config.minutes_per_card,
            },
        }
    }

    /// 校验工时参数: 必须为正, 且可表示为时间跨度
    pub fn validate(&self) -> PlanningResult<()> {
        let (key, minutes) = match *self {
            DurationRule::PerUnit { minutes_per_unit } => ("单卡工时", minutes_per_unit),
            DurationRule::FixedPerOrder { minutes } => ("扫描每单工时", minutes),
        };
        if minutes <= 0 {
            return Err(PlanningError::InvalidConfig(format!("{}必须为正数: {}", key, minutes)));
        }
        if TimeDelta::try_minutes(minutes).is_none() {
            return Err(PlanningError::InvalidConfig(format!("{}超出范围: {}", key, minutes)));
        }
        Ok(())
    }

    /// 计算工单时长
    ///
    /// # 返回
    /// - `Ok(minutes)`: 可排
    /// - `Err(NoCards)`: 按张计时且卡牌数为空/0
    /// - `Err(DurationOutOfRange)`: 卡牌数 × 单卡工时 溢出
    pub fn duration_minutes(&self, item: &WorkItem) -> Result<i64, SkipReason> {
        let minutes = match *self {
            DurationRule::PerUnit { minutes_per_unit } => {
                if item.has_no_cards() {
                    return Err(SkipReason::NoCards);
                }
                let count = i64::from(item.card_count.unwrap_or(0));
                count
                    .checked_mul(minutes_per_unit)
                    .ok_or(SkipReason::DurationOutOfRange)?
            }
            DurationRule::FixedPerOrder { minutes } => minutes,
        };

        match TimeDelta::try_minutes(minutes) {
            Some(_) => Ok(minutes),
            None => Err(SkipReason::DurationOutOfRange),
        }
    }
}
