// ==========================================
// 3D 打印工坊台账 - 打印任务数据仓储
// ==========================================
// 红线: 任务变更与库存流水在同一事务内提交
// 红线: Repository 不含业务逻辑，只执行引擎产出的计划
// ==========================================

use crate::domain::{InventoryMovement, JobStatus, NewPrintJob, PrintJob, PrintJobView};
use crate::engine::{JobChange, JobTransitionPlan};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::movement_repo::record_movement;
use crate::repository::{format_ts, lock_conn, parse_ts};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT j.id, j.object_id, j.filament_id, j.printer_id, j.quantity, j.hours,
           j.filament_used_g, j.status, j.created_at, j.completed_at
    FROM print_jobs j
"#;

/// 进行中状态 (SQL 片段)
const ACTIVE_STATUS_SQL: &str = "('queued', 'pending', 'printing')";

// ==========================================
// PrintJobRepository - 打印任务仓储
// ==========================================
pub struct PrintJobRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PrintJobRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 插入新任务并写入预留流水
    ///
    /// 流水的 job_id 在插入任务后补齐
    pub fn create_with_movements(
        &self,
        job: &NewPrintJob,
        movements: &[InventoryMovement],
    ) -> RepositoryResult<PrintJob> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO print_jobs (
                object_id, filament_id, printer_id, quantity, hours,
                filament_used_g, status, created_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)
            "#,
            params![
                job.object_id,
                job.filament_id,
                job.printer_id,
                job.quantity,
                job.hours,
                job.filament_used_g,
                job.status.to_db_str(),
                format_ts(&job.created_at),
            ],
        )?;
        let job_id = tx.last_insert_rowid();

        for movement in movements {
            let mut movement = movement.clone();
            movement.job_id = Some(job_id);
            record_movement(&tx, &movement)?;
        }

        tx.commit()?;
        Ok(job.clone().with_id(job_id))
    }

    /// 执行状态转换计划
    pub fn apply_transition(&self, plan: &JobTransitionPlan) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let affected = match &plan.change {
            JobChange::Update(job) => tx.execute(
                r#"
                UPDATE print_jobs
                SET quantity = ?1, hours = ?2, filament_used_g = ?3,
                    status = ?4, completed_at = ?5
                WHERE id = ?6
                "#,
                params![
                    job.quantity,
                    job.hours,
                    job.filament_used_g,
                    job.status.to_db_str(),
                    job.completed_at.as_ref().map(format_ts),
                    job.id,
                ],
            )?,
            JobChange::Delete { job_id } => {
                tx.execute("DELETE FROM print_jobs WHERE id = ?1", params![job_id])?
            }
        };
        if affected == 0 {
            let job_id = match &plan.change {
                JobChange::Update(job) => job.id,
                JobChange::Delete { job_id } => *job_id,
            };
            return Err(RepositoryError::not_found("PrintJob", job_id));
        }

        for movement in &plan.movements {
            record_movement(&tx, movement)?;
        }

        tx.commit()?;
        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<PrintJob>> {
        let conn = self.get_conn()?;
        let job = conn
            .query_row(
                &format!("{} WHERE j.id = ?1", SELECT_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(job)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<PrintJob>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY j.id ASC", SELECT_COLUMNS))?;
        let jobs = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(jobs)
    }

    /// 打印队列: 进行中的任务 + 关联名称 (按创建时间)
    pub fn list_active_views(&self) -> RepositoryResult<Vec<PrintJobView>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT j.id, j.object_id, j.filament_id, j.printer_id, j.quantity, j.hours,
                   j.filament_used_g, j.status, j.created_at, j.completed_at,
                   o.name, f.name, p.name
            FROM print_jobs j
            LEFT JOIN objects o ON o.id = j.object_id
            LEFT JOIN filaments f ON f.id = j.filament_id
            LEFT JOIN printers p ON p.id = j.printer_id
            WHERE j.status IN {}
            ORDER BY j.created_at ASC, j.id ASC
            "#,
            ACTIVE_STATUS_SQL
        );
        let mut stmt = conn.prepare(&sql)?;
        let views = stmt
            .query_map([], |row| {
                Ok(PrintJobView {
                    job: map_row(row)?,
                    object_name: row.get(10)?,
                    filament_name: row.get(11)?,
                    printer_name: row.get(12)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(views)
    }

    /// 引用该耗材的进行中任务ID
    pub fn active_ids_by_filament(&self, filament_id: i64) -> RepositoryResult<Vec<i64>> {
        self.active_ids_by("filament_id", filament_id)
    }

    /// 引用该打印机的进行中任务ID
    pub fn active_ids_by_printer(&self, printer_id: i64) -> RepositoryResult<Vec<i64>> {
        self.active_ids_by("printer_id", printer_id)
    }

    /// 引用该对象的进行中任务ID
    pub fn active_ids_by_object(&self, object_id: i64) -> RepositoryResult<Vec<i64>> {
        self.active_ids_by("object_id", object_id)
    }

    fn active_ids_by(&self, column: &'static str, id: i64) -> RepositoryResult<Vec<i64>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id FROM print_jobs WHERE {} = ?1 AND status IN {} ORDER BY id ASC",
            column, ACTIVE_STATUS_SQL
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<SqliteResult<Vec<i64>>>()?;
        Ok(ids)
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<PrintJob> {
    let status_raw: String = row.get(7)?;
    let status = JobStatus::from_db_str(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Text,
            format!("未知的任务状态: {}", status_raw).into(),
        )
    })?;
    let completed_at = match row.get::<_, Option<String>>(9)? {
        Some(raw) => Some(parse_ts(9, &raw)?),
        None => None,
    };

    Ok(PrintJob {
        id: row.get(0)?,
        object_id: row.get(1)?,
        filament_id: row.get(2)?,
        printer_id: row.get(3)?,
        quantity: row.get(4)?,
        hours: row.get(5)?,
        filament_used_g: row.get(6)?,
        status,
        created_at: parse_ts(8, &row.get::<_, String>(8)?)?,
        completed_at,
    })
}
