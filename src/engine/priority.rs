// ==========================================
// 卡牌评级工坊排班系统 - 时效等级分类与队列排序
// ==========================================
// 职责: 时效代码 → rank/展示名; 阶段队列排序
// 输入: 工单列表（任意顺序）
// 输出: rank 升序 → 提交日期升序 → 到达顺序 的工单列表
// ==========================================
// 红线: 纯函数, 无失败分支; 未识别代码按 Classic 处理
// ==========================================

use crate::domain::{DelayCode, WorkItem};
use std::cmp::Ordering;

// ==========================================
// PriorityClassifier - 时效等级分类器
// ==========================================
pub struct PriorityClassifier {
    // 无状态引擎,不需要注入依赖
}

impl PriorityClassifier {
    pub fn new() -> Self {
        Self {}
    }

    /// 时效代码对应的 rank（越小越紧急）
    ///
    /// X=1, F+=2, F=3, C=4, E=5; 缺省/未知 → 4
    pub fn rank(&self, code: Option<&str>) -> u8 {
        Self::rank_of(DelayCode::from_code(code))
    }

    /// 时效代码对应的展示名（仅用于报表）
    pub fn label(&self, code: Option<&str>) -> &'static str {
        Self::label_of(DelayCode::from_code(code))
    }

    pub fn rank_of(delay: DelayCode) -> u8 {
        match delay {
            DelayCode::Express => 1,
            DelayCode::FastPlus => 2,
            DelayCode::Fast => 3,
            DelayCode::Classic => 4,
            DelayCode::Economy => 5,
        }
    }

    pub fn label_of(delay: DelayCode) -> &'static str {
        match delay {
            DelayCode::Express => "Express",
            DelayCode::FastPlus => "Fast Plus",
            DelayCode::Fast => "Fast",
            DelayCode::Classic => "Classic",
            DelayCode::Economy => "Economy",
        }
    }

    // ==========================================
    // 队列排序
    // ==========================================

    /// 排序阶段队列
    ///
    /// 排序键:
    /// 1) rank 升序
    /// 2) submitted_on 升序
    /// 3) 原始顺序（稳定排序保证）
    pub fn sort(&self, mut items: Vec<WorkItem>) -> Vec<WorkItem> {
        items.sort_by(|a, b| self.compare(a, b));
        items
    }

    fn compare(&self, a: &WorkItem, b: &WorkItem) -> Ordering {
        Self::rank_of(a.delay())
            .cmp(&Self::rank_of(b.delay()))
            .then_with(|| a.submitted_on.cmp(&b.submitted_on))
    }
}

impl Default for PriorityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;
    use chrono::NaiveDate;

    fn item(id: &str, delay: Option<&str>, day: u32) -> WorkItem {
        WorkItem {
            work_item_id: id.to_string(),
            order_label: None,
            card_count: Some(1),
            delay_code: delay.map(|d| d.to_string()),
            stage: Stage::Grading,
            submitted_on: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
        }
    }

    #[test]
    fn test_rank_table() {
        let c = PriorityClassifier::new();
        assert_eq!(c.rank(Some("X")), 1);
        assert_eq!(c.rank(Some("F+")), 2);
        assert_eq!(c.rank(Some("F")), 3);
        assert_eq!(c.rank(Some("C")), 4);
        assert_eq!(c.rank(Some("E")), 5);
    }

    #[test]
    fn test_unknown_and_missing_default_to_classic() {
        let c = PriorityClassifier::new();
        assert_eq!(c.rank(None), 4);
        assert_eq!(c.rank(Some("")), 4);
        assert_eq!(c.rank(Some("URGENT")), 4);
        assert_eq!(c.label(Some("URGENT")), "Classic");
    }

    #[test]
    fn test_labels() {
        let c = PriorityClassifier::new();
        assert_eq!(c.label(Some("X")), "Express");
        assert_eq!(c.label(Some("F+")), "Fast Plus");
        assert_eq!(c.label(Some("E")), "Economy");
    }

    #[test]
    fn test_sort_rank_then_date_then_arrival() {
        let c = PriorityClassifier::new();
        let sorted = c.sort(vec![
            item("c-late", Some("C"), 9),
            item("c-early-1", None, 3),
            item("x", Some("X"), 20),
            item("c-early-2", Some("C"), 3),
            item("e", Some("E"), 1),
        ]);

        let ids: Vec<_> = sorted.iter().map(|i| i.work_item_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "c-early-1", "c-early-2", "c-late", "e"]);
    }
}
