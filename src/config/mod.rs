// ==========================================
// 卡牌评级工坊排班系统 - 配置层
// ==========================================
// 职责: 排班参数管理, 支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod planning_config;
pub mod planning_config_trait;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use planning_config::PlanningConfig;
pub use planning_config_trait::PlanningConfigReader;
