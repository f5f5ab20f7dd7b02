// ==========================================
// 卡牌评级工坊排班系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::Stage;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 排班引擎错误类型
#[derive(Error, Debug)]
pub enum PlanningError {
    // ===== 配置错误 =====
    /// 阶段有待处理工单但无可用员工（整阶段中止）
    #[error("配置错误: 阶段 {stage} 有 {pending} 个待处理工单, 但没有持有角色 {role} 的可用员工")]
    NoEligibleEmployees {
        stage: Stage,
        role: &'static str,
        pending: usize,
    },

    #[error("排班参数无效: {0}")]
    InvalidConfig(String),

    // ===== 外部协作者错误 =====
    #[error("数据访问失败: {0}")]
    Repository(#[from] RepositoryError),
}

impl PlanningError {
    /// 是否为配置类错误（不影响整次运行的成功标记）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PlanningError::NoEligibleEmployees { .. } | PlanningError::InvalidConfig(_)
        )
    }
}

/// Result 类型别名
pub type PlanningResult<T> = Result<T, PlanningError>;
