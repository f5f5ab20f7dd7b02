// ==========================================
// 卡牌评级工坊排班系统 - 排班参数快照
// ==========================================
// 用途: 一次排班运行开始时读取一次配置, 运行期间不再变化
// ==========================================

use crate::config::planning_config_trait::PlanningConfigReader;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// 默认上班时间
pub const DEFAULT_WORKDAY_START: (u32, u32) = (9, 0);
/// 默认下班时间
pub const DEFAULT_WORKDAY_END: (u32, u32) = (18, 0);
pub const DEFAULT_BREAK_MINUTES: i64 = 5;
pub const DEFAULT_MINUTES_PER_CARD: i64 = 3;
pub const DEFAULT_SCAN_MINUTES_PER_ORDER: i64 = 5;

/// 排班参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub workday_start: NaiveTime,
    pub workday_end: NaiveTime,
    pub break_minutes: i64,
    pub minutes_per_card: i64,
    pub scan_minutes_per_order: i64,
    pub clear_existing_entries: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            workday_start: hm(DEFAULT_WORKDAY_START),
            workday_end: hm(DEFAULT_WORKDAY_END),
            break_minutes: DEFAULT_BREAK_MINUTES,
            minutes_per_card: DEFAULT_MINUTES_PER_CARD,
            scan_minutes_per_order: DEFAULT_SCAN_MINUTES_PER_ORDER,
            clear_existing_entries: true,
        }
    }
}

pub(crate) fn hm((h, m): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

impl PlanningConfig {
    /// 从任意配置读取器加载完整快照
    pub fn load<C>(reader: &C) -> Result<Self, Box<dyn Error>>
    where
        C: PlanningConfigReader + ?Sized,
    {
        Ok(Self {
            workday_start: reader.get_workday_start()?,
            workday_end: reader.get_workday_end()?,
            break_minutes: reader.get_break_minutes()?,
            minutes_per_card: reader.get_minutes_per_card()?,
            scan_minutes_per_order: reader.get_scan_minutes_per_order()?,
            clear_existing_entries: reader.get_clear_existing_entries()?,
        })
    }
}

// 静态配置本身也是一个读取器（测试与嵌入场景直接使用）
impl PlanningConfigReader for PlanningConfig {
    fn get_workday_start(&self) -> Result<NaiveTime, Box<dyn Error>> {
        Ok(self.workday_start)
    }

    fn get_workday_end(&self) -> Result<NaiveTime, Box<dyn Error>> {
        Ok(self.workday_end)
    }

    fn get_break_minutes(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self.break_minutes)
    }

    fn get_minutes_per_card(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self.minutes_per_card)
    }

    fn get_scan_minutes_per_order(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self.scan_minutes_per_order)
    }

    fn get_clear_existing_entries(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self.clear_existing_entries)
    }
}
