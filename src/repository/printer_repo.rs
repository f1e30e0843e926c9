// ==========================================
// 3D 打印工坊台账 - 打印机数据仓储
// ==========================================

use crate::domain::{Printer, PrinterDraft};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::lock_conn;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str =
    "SELECT id, name, price, wear_per_hour, power_kwh_per_hour FROM printers";

pub struct PrinterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PrinterRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    pub fn insert(&self, draft: &PrinterDraft) -> RepositoryResult<Printer> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO printers (name, price, wear_per_hour, power_kwh_per_hour) VALUES (?1, ?2, ?3, ?4)",
            params![draft.name, draft.price, draft.wear_per_hour, draft.power_kwh_per_hour],
        )?;
        Ok(Printer {
            id: conn.last_insert_rowid(),
            name: draft.name.clone(),
            price: draft.price,
            wear_per_hour: draft.wear_per_hour,
            power_kwh_per_hour: draft.power_kwh_per_hour,
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Printer>> {
        let conn = self.get_conn()?;
        let printer = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_row)
            .optional()?;
        Ok(printer)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Printer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
        let printers = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(printers)
    }

    pub fn update(&self, printer: &Printer) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE printers
            SET name = ?1, price = ?2, wear_per_hour = ?3, power_kwh_per_hour = ?4
            WHERE id = ?5
            "#,
            params![
                printer.name,
                printer.price,
                printer.wear_per_hour,
                printer.power_kwh_per_hour,
                printer.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Printer", printer.id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM printers WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Printer", id));
        }
        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<Printer> {
    Ok(Printer {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        wear_per_hour: row.get(3)?,
        power_kwh_per_hour: row.get(4)?,
    })
}
