// ==========================================
// 卡牌评级工坊排班系统 - 领域类型定义
// ==========================================
// 职责: 工序阶段、时效等级等封闭枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工序阶段 (Pipeline Stage)
// ==========================================
// 顺序即编排顺序: 评级 → 认证 → 整备 → 扫描
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Grading,       // 评级
    Certification, // 认证
    Preparation,   // 整备
    Scanning,      // 扫描
}

impl Stage {
    /// 编排顺序
    pub const ALL: [Stage; 4] = [
        Stage::Grading,
        Stage::Certification,
        Stage::Preparation,
        Stage::Scanning,
    ];

    /// 该阶段对应的员工角色
    pub fn role(&self) -> &'static str {
        match self {
            Stage::Grading => "grader",
            Stage::Certification => "certifier",
            Stage::Preparation => "preparer",
            Stage::Scanning => "scanner",
        }
    }

    /// 从字符串解析阶段（大小写不敏感）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GRADING" => Some(Stage::Grading),
            "CERTIFICATION" => Some(Stage::Certification),
            "PREPARATION" => Some(Stage::Preparation),
            "SCANNING" => Some(Stage::Scanning),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Stage::Grading => "GRADING",
            Stage::Certification => "CERTIFICATION",
            Stage::Preparation => "PREPARATION",
            Stage::Scanning => "SCANNING",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 时效等级 (Delay Code)
// ==========================================
// 红线: 等级制, rank 越小越紧急
// 缺省/无法识别 → Classic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayCode {
    #[serde(rename = "X")]
    Express, // 特快
    #[serde(rename = "F+")]
    FastPlus, // 加急+
    #[serde(rename = "F")]
    Fast, // 加急
    #[serde(rename = "C")]
    Classic, // 标准
    #[serde(rename = "E")]
    Economy, // 经济
}

impl DelayCode {
    /// 从原始代码解析，缺省或未知代码归为 Classic
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_uppercase()).as_deref() {
            Some("X") => DelayCode::Express,
            Some("F+") => DelayCode::FastPlus,
            Some("F") => DelayCode::Fast,
            Some("C") => DelayCode::Classic,
            Some("E") => DelayCode::Economy,
            _ => DelayCode::default(),
        }
    }

    /// 转换为数据库存储的字符串
    pub fn as_code(&self) -> &'static str {
        match self {
            DelayCode::Express => "X",
            DelayCode::FastPlus => "F+",
            DelayCode::Fast => "F",
            DelayCode::Classic => "C",
            DelayCode::Economy => "E",
        }
    }
}

impl Default for DelayCode {
    fn default() -> Self {
        DelayCode::Classic
    }
}

impl fmt::Display for DelayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}
