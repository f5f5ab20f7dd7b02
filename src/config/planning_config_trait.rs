// ==========================================
// 卡牌评级工坊排班系统 - 排班配置读取 Trait
// ==========================================
// 职责: 定义排班编排所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use chrono::NaiveTime;
use std::error::Error;

// ==========================================
// PlanningConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、PlanningConfig（静态配置）
pub trait PlanningConfigReader {
    // ===== 工作时段 =====

    /// 获取每日上班时间
    ///
    /// # 默认值
    /// - 09:00
    fn get_workday_start(&self) -> Result<NaiveTime, Box<dyn Error>>;

    /// 获取每日下班时间
    ///
    /// # 默认值
    /// - 18:00
    fn get_workday_end(&self) -> Result<NaiveTime, Box<dyn Error>>;

    /// 获取相邻任务之间的间隔（分钟）
    ///
    /// # 默认值
    /// - 5
    fn get_break_minutes(&self) -> Result<i64, Box<dyn Error>>;

    // ===== 工时口径 =====

    /// 获取按张计时阶段的单卡工时（分钟/张）
    ///
    /// # 默认值
    /// - 3
    ///
    /// # 用途
    /// - 评级/认证/整备: 时长 = 卡牌数 × 单卡工时
    fn get_minutes_per_card(&self) -> Result<i64, Box<dyn Error>>;

    /// 获取扫描阶段每单固定工时（分钟/单）
    ///
    /// # 默认值
    /// - 5
    ///
    /// # 用途
    /// - 扫描阶段时长与卡牌数量无关
    fn get_scan_minutes_per_order(&self) -> Result<i64, Box<dyn Error>>;

    // ===== 运行选项 =====

    /// 排班前是否清理当日已有明细
    ///
    /// # 默认值
    /// - true
    fn get_clear_existing_entries(&self) -> Result<bool, Box<dyn Error>>;
}
