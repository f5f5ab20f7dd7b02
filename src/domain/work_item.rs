// ==========================================
// 卡牌评级工坊排班系统 - 工单领域模型
// ==========================================
// 红线: 工单由外部系统维护, 排班核心只读
// ==========================================

use crate::domain::types::{DelayCode, Stage};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// WorkItem - 待处理工单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub work_item_id: String,          // 工单ID
    pub order_label: Option<String>,   // 订单/客户标识 (仅用于展示)
    pub card_count: Option<u32>,       // 卡牌数量 (可能缺失)
    pub delay_code: Option<String>,    // 原始时效代码 (X/F+/F/C/E)
    pub stage: Stage,                  // 当前工序阶段
    pub submitted_on: NaiveDate,       // 提交日期
}

impl WorkItem {
    /// 归一化后的时效等级
    pub fn delay(&self) -> DelayCode {
        DelayCode::from_code(self.delay_code.as_deref())
    }

    /// 卡牌数量是否为空 (缺失或为 0)
    pub fn has_no_cards(&self) -> bool {
        self.card_count.unwrap_or(0) == 0
    }
}
