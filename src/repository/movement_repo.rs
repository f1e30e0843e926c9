// ==========================================
// 3D 打印工坊台账 - 库存流水仓储
// ==========================================
// 红线: 计数器更新与流水写入必须在同一事务内
// 说明: 写入辅助函数接收 &Connection，调用方传入事务 (Transaction 可 Deref 为 Connection)
// ==========================================

use crate::domain::{InventoryMovement, MovementKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_ts, lock_conn, parse_ts};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT movement_id, job_id, filament_id, kind,
           delta_effective_g, delta_projected_g, movement_ts, detail, payload_json
    FROM inventory_movement
"#;

// ==========================================
// MovementRepository - 库存流水仓储
// ==========================================
pub struct MovementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MovementRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// 查询耗材的全部流水 (按时间升序)
    pub fn list_by_filament(&self, filament_id: i64) -> RepositoryResult<Vec<InventoryMovement>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE filament_id = ?1 ORDER BY movement_ts ASC, rowid ASC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![filament_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询任务的全部流水
    pub fn list_by_job(&self, job_id: i64) -> RepositoryResult<Vec<InventoryMovement>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE job_id = ?1 ORDER BY movement_ts ASC, rowid ASC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![job_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}

// ==========================================
// 事务内写入辅助
// ==========================================

/// 叠加增量到耗材计数器并写入流水
pub(crate) fn record_movement(conn: &Connection, movement: &InventoryMovement) -> RepositoryResult<()> {
    let affected = conn.execute(
        r#"
        UPDATE filaments
        SET remaining_g_effective = remaining_g_effective + ?1,
            remaining_g_projected = remaining_g_projected + ?2
        WHERE id = ?3
        "#,
        params![
            movement.delta_effective_g,
            movement.delta_projected_g,
            movement.filament_id,
        ],
    )?;
    if affected == 0 {
        return Err(RepositoryError::not_found("Filament", movement.filament_id));
    }

    conn.execute(
        r#"
        INSERT INTO inventory_movement (
            movement_id, job_id, filament_id, kind,
            delta_effective_g, delta_projected_g, movement_ts, detail, payload_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            movement.movement_id,
            movement.job_id,
            movement.filament_id,
            movement.kind.to_db_str(),
            movement.delta_effective_g,
            movement.delta_projected_g,
            format_ts(&movement.movement_ts),
            movement.detail,
            movement.payload_json.as_ref().map(|v| v.to_string()),
        ],
    )?;
    Ok(())
}

fn map_row(row: &Row<'_>) -> SqliteResult<InventoryMovement> {
    let kind_raw: String = row.get(3)?;
    let kind = MovementKind::from_db_str(&kind_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("未知的流水类型: {}", kind_raw).into(),
        )
    })?;
    let payload_json = match row.get::<_, Option<String>>(8)? {
        Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
        })?),
        None => None,
    };

    Ok(InventoryMovement {
        movement_id: row.get(0)?,
        job_id: row.get(1)?,
        filament_id: row.get(2)?,
        kind,
        delta_effective_g: row.get(4)?,
        delta_projected_g: row.get(5)?,
        movement_ts: parse_ts(6, &row.get::<_, String>(6)?)?,
        detail: row.get(7)?,
        payload_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use chrono::Utc;
    use serde_json::json;

    fn setup() -> Arc<Mutex<Connection>> {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO filaments (id, name, color, material, price, initial_g, remaining_g_effective, remaining_g_projected)
             VALUES (1, 'PLA', 'blanco', 'PLA', 10000, 1000, 1000, 1000)",
            [],
        )
        .unwrap();
        Arc::new(Mutex::new(conn))
    }

    #[test]
    fn test_record_movement_updates_counters_and_ledger() {
        let conn = setup();
        let now = Utc::now().naive_utc();
        {
            let guard = conn.lock().unwrap();
            let m = InventoryMovement::new(Some(5), 1, MovementKind::Reserve, 0, -120, now)
                .with_detail("预留")
                .with_payload(json!({"quantity": 2}));
            record_movement(&guard, &m).unwrap();

            let (eff, proj): (i64, i64) = guard
                .query_row(
                    "SELECT remaining_g_effective, remaining_g_projected FROM filaments WHERE id = 1",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .unwrap();
            assert_eq!((eff, proj), (1000, 880));
        }

        let repo = MovementRepository::new(conn);
        let ledger = repo.list_by_filament(1).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].kind, MovementKind::Reserve);
        assert_eq!(ledger[0].delta_projected_g, -120);
        assert_eq!(ledger[0].movement_ts, now);
        assert_eq!(ledger[0].payload_json, Some(json!({"quantity": 2})));
        assert_eq!(repo.list_by_job(5).unwrap().len(), 1);
    }

    #[test]
    fn test_record_movement_unknown_filament() {
        let conn = setup();
        let guard = conn.lock().unwrap();
        let m = InventoryMovement::new(None, 99, MovementKind::Adjust, 10, 10, Utc::now().naive_utc());
        let result = record_movement(&guard, &m);
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }
}
