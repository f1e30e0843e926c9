// ==========================================
// 3D 打印工坊台账 - 打印对象数据仓储
// ==========================================
// 职责: objects 表 CRUD + 批量重算价格落库
// ==========================================

use crate::domain::{Object3D, ObjectDraft};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::lock_conn;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, stl_path, gcode_path, objects, weight_grams,
           print_time_hours, cost, suggested_price
    FROM objects
"#;

pub struct ObjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ObjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// 新增对象 (价格由调用方预先计算)
    pub fn insert(&self, draft: &ObjectDraft, cost: i64, suggested_price: i64) -> RepositoryResult<Object3D> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO objects (
                name, stl_path, gcode_path, objects, weight_grams,
                print_time_hours, cost, suggested_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                draft.name,
                draft.stl_path,
                draft.gcode_path,
                draft.objects,
                draft.weight_grams,
                draft.print_time_hours,
                cost,
                suggested_price,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(draft.clone().into_object(id, cost, suggested_price))
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Object3D>> {
        let conn = self.get_conn()?;
        let object = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_row)
            .optional()?;
        Ok(object)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Object3D>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
        let objects = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(objects)
    }

    /// 全字段更新
    pub fn update(&self, object: &Object3D) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE objects
            SET name = ?1, stl_path = ?2, gcode_path = ?3, objects = ?4,
                weight_grams = ?5, print_time_hours = ?6, cost = ?7, suggested_price = ?8
            WHERE id = ?9
            "#,
            params![
                object.name,
                object.stl_path,
                object.gcode_path,
                object.objects,
                object.weight_grams,
                object.print_time_hours,
                object.cost,
                object.suggested_price,
                object.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Object3D", object.id));
        }
        Ok(())
    }

    /// 批量写入重算后的价格 (单事务)
    ///
    /// # 参数
    /// - `prices`: (object_id, cost, suggested_price)
    ///
    /// # 返回
    /// - Ok(usize): 实际更新的行数
    pub fn update_prices(&self, prices: &[(i64, i64, i64)]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare("UPDATE objects SET cost = ?1, suggested_price = ?2 WHERE id = ?3")?;
            for (id, cost, suggested_price) in prices {
                updated += stmt.execute(params![cost, suggested_price, id])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM objects WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Object3D", id));
        }
        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<Object3D> {
    Ok(Object3D {
        id: row.get(0)?,
        name: row.get(1)?,
        stl_path: row.get(2)?,
        gcode_path: row.get(3)?,
        objects: row.get(4)?,
        weight_grams: row.get(5)?,
        print_time_hours: row.get(6)?,
        cost: row.get(7)?,
        suggested_price: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn draft() -> ObjectDraft {
        ObjectDraft {
            name: "llavero".to_string(),
            stl_path: "/modelos/llavero.stl".to_string(),
            gcode_path: "/modelos/llavero.gcode".to_string(),
            objects: 4,
            weight_grams: 12,
            print_time_hours: 0.5,
        }
    }

    #[test]
    fn test_object_insert_update_delete() {
        let repo = ObjectRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())));
        let mut object = repo.insert(&draft(), 300, 600).unwrap();
        assert_eq!(repo.find_by_id(object.id).unwrap(), Some(object.clone()));

        object.objects = 5;
        repo.update(&object).unwrap();
        assert_eq!(repo.find_by_id(object.id).unwrap().unwrap().objects, 5);

        repo.delete(object.id).unwrap();
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_prices_in_batch() {
        let repo = ObjectRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())));
        let a = repo.insert(&draft(), 0, 0).unwrap();
        let b = repo.insert(&draft(), 0, 0).unwrap();

        let updated = repo.update_prices(&[(a.id, 100, 200), (b.id, 150, 300), (999, 1, 1)]).unwrap();
        assert_eq!(updated, 2);
        assert_eq!(repo.find_by_id(b.id).unwrap().unwrap().suggested_price, 300);
    }
}
