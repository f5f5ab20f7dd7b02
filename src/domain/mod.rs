// ==========================================
// 卡牌评级工坊排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod employee;
pub mod schedule;
pub mod types;
pub mod work_item;

// 重导出核心类型
pub use employee::EmployeeProfile;
pub use schedule::ScheduleEntry;
pub use types::{DelayCode, Stage};
pub use work_item::WorkItem;
