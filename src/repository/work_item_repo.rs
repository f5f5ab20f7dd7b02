// ==========================================
// 卡牌评级工坊排班系统 - 工单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 排序口径与 PriorityClassifier 保持一致（引擎侧仍会再次稳定排序）
// ==========================================

use crate::domain::{Stage, WorkItem};
use crate::engine::ports::WorkItemSource;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 工单原始行（先取字符串，再在闭包外做类型转换，避免吞掉格式错误）
struct WorkItemRow {
    work_item_id: String,
    order_label: Option<String>,
    card_count: Option<i64>,
    delay_code: Option<String>,
    stage: String,
    submitted_on: String,
}

impl WorkItemRow {
    fn into_domain(self) -> RepositoryResult<WorkItem> {
        let stage = Stage::from_str(&self.stage).ok_or_else(|| RepositoryError::FieldValueError {
            field: "stage".to_string(),
            message: format!("work_item_id={}, 未知阶段 {}", self.work_item_id, self.stage),
        })?;

        let submitted_on = NaiveDate::parse_from_str(&self.submitted_on, "%Y-%m-%d").map_err(|e| {
            RepositoryError::FieldValueError {
                field: "submitted_on".to_string(),
                message: format!("work_item_id={}, {}", self.work_item_id, e),
            }
        })?;

        // 负数视为缺失
        let card_count = self.card_count.and_then(|c| u32::try_from(c).ok());

        Ok(WorkItem {
            work_item_id: self.work_item_id,
            order_label: self.order_label,
            card_count,
            delay_code: self.delay_code,
            stage,
            submitted_on,
        })
    }
}

// ==========================================
// WorkItemRepository - 工单仓储
// ==========================================
pub struct WorkItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkItemRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新工单（arrival_seq 保持首次到达顺序）
    pub fn upsert(&self, item: &WorkItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO work_item (
                work_item_id, order_label, card_count, delay_code, stage, submitted_on, is_open, arrival_seq
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, 1,
                (SELECT COALESCE(MAX(arrival_seq), 0) + 1 FROM work_item)
            )
            ON CONFLICT(work_item_id) DO UPDATE SET
                order_label = excluded.order_label,
                card_count = excluded.card_count,
                delay_code = excluded.delay_code,
                stage = excluded.stage,
                submitted_on = excluded.submitted_on
            "#,
            params![
                item.work_item_id,
                item.order_label,
                item.card_count,
                item.delay_code,
                item.stage.to_db_str(),
                item.submitted_on.format("%Y-%m-%d").to_string(),
            ],
        )?;

        Ok(())
    }

    /// 关闭工单（不再参与排班）
    pub fn close(&self, work_item_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE work_item SET is_open = 0 WHERE work_item_id = ?1",
            params![work_item_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "work_item".to_string(),
                id: work_item_id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询某阶段的未完结工单
    ///
    /// # 排序
    /// 1) 时效等级 rank 升序 (X=1, F+=2, F=3, C/未知=4, E=5)
    /// 2) 提交日期升序
    /// 3) 到达顺序
    pub fn list_open_by_stage(&self, stage: Stage) -> RepositoryResult<Vec<WorkItem>> {
        let rows = {
            let conn = self.get_conn()?;

            let mut stmt = conn.prepare(
                r#"
                SELECT work_item_id, order_label, card_count, delay_code, stage, submitted_on
                FROM work_item
                WHERE stage = ?1 AND is_open = 1
                ORDER BY
                    CASE UPPER(TRIM(COALESCE(delay_code, '')))
                        WHEN 'X' THEN 1
                        WHEN 'F+' THEN 2
                        WHEN 'F' THEN 3
                        WHEN 'E' THEN 5
                        ELSE 4
                    END,
                    submitted_on,
                    arrival_seq,
                    rowid
                "#,
            )?;

            let rows = stmt
                .query_map(params![stage.to_db_str()], |row| {
                    Ok(WorkItemRow {
                        work_item_id: row.get(0)?,
                        order_label: row.get(1)?,
                        card_count: row.get(2)?,
                        delay_code: row.get(3)?,
                        stage: row.get(4)?,
                        submitted_on: row.get(5)?,
                    })
                })?
                .collect::<SqliteResult<Vec<WorkItemRow>>>()?;
            rows
        };

        rows.into_iter().map(WorkItemRow::into_domain).collect()
    }
}

impl WorkItemSource for WorkItemRepository {
    fn list_pending_work_items(&self, stage: Stage) -> RepositoryResult<Vec<WorkItem>> {
        self.list_open_by_stage(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn repo() -> (Arc<Mutex<Connection>>, WorkItemRepository) {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), WorkItemRepository::new(conn))
    }

    fn item(id: &str, delay: Option<&str>, day: u32) -> WorkItem {
        WorkItem {
            work_item_id: id.to_string(),
            order_label: None,
            card_count: Some(4),
            delay_code: delay.map(|d| d.to_string()),
            stage: Stage::Grading,
            submitted_on: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
        }
    }

    #[test]
    fn test_open_items_ordered_by_rank_then_date() {
        let (_conn, repo) = repo();
        repo.upsert(&item("A", Some("E"), 1)).unwrap();
        repo.upsert(&item("B", None, 3)).unwrap();
        repo.upsert(&item("C", Some("X"), 4)).unwrap();
        repo.upsert(&item("D", Some("C"), 2)).unwrap();
        repo.upsert(&item("E", Some("f+"), 5)).unwrap();

        let ids: Vec<_> = repo
            .list_pending_work_items(Stage::Grading)
            .unwrap()
            .into_iter()
            .map(|i| i.work_item_id)
            .collect();
        assert_eq!(ids, vec!["C", "E", "D", "B", "A"]);
    }

    #[test]
    fn test_closed_items_are_excluded() {
        let (_conn, repo) = repo();
        repo.upsert(&item("A", Some("X"), 1)).unwrap();
        repo.upsert(&item("B", Some("X"), 1)).unwrap();
        repo.close("A").unwrap();

        let items = repo.list_open_by_stage(Stage::Grading).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].work_item_id, "B");
        assert!(matches!(repo.close("missing"), Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_date_is_reported() {
        let (conn, repo) = repo();
        conn.lock()
            .unwrap()
            .execute(
                "INSERT INTO work_item (work_item_id, stage, submitted_on) VALUES ('BAD', 'GRADING', 'yesterday')",
                [],
            )
            .unwrap();

        let err = repo.list_open_by_stage(Stage::Grading).unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "submitted_on"));
    }
}
