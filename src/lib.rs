// ==========================================
// 卡牌评级工坊排班系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按角色与时效等级, 将评级/认证/整备/扫描工单贪心分配给员工
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{DelayCode, EmployeeProfile, ScheduleEntry, Stage, WorkItem};

// 引擎
pub use engine::{
    PlanningOrchestrator, PlanningPorts, PlanningReport, PlanningRunOptions, PriorityClassifier,
    StageAssignmentEngine, TimeSlotPlanner, WorkloadTracker,
};

// 配置
pub use config::{ConfigManager, PlanningConfig, PlanningConfigReader};

// 仓储
pub use repository::{EmployeeRepository, ScheduleEntryRepository, WorkItemRepository};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "卡牌评级工坊排班系统";
