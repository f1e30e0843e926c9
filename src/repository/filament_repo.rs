// ==========================================
// 3D 打印工坊台账 - 耗材数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::{Filament, FilamentDraft, InventoryMovement};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::lock_conn;
use crate::repository::movement_repo::record_movement;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, color, material, price, initial_g,
           remaining_g_effective, remaining_g_projected
    FROM filaments
"#;

// ==========================================
// FilamentRepository - 耗材仓储
// ==========================================
/// 耗材仓储
/// 职责: 管理 filaments 表的 CRUD 操作
pub struct FilamentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FilamentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// 新增耗材
    ///
    /// 预测库存初始值与有效库存一致
    ///
    /// # 返回
    /// - Ok(Filament): 入库后的耗材 (含自增ID)
    pub fn insert(&self, draft: &FilamentDraft) -> RepositoryResult<Filament> {
        let conn = self.get_conn()?;
        let remaining = draft.remaining_g_effective.unwrap_or(draft.initial_g);

        conn.execute(
            r#"
            INSERT INTO filaments (
                name, color, material, price, initial_g,
                remaining_g_effective, remaining_g_projected
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                draft.name,
                draft.color,
                draft.material,
                draft.price,
                draft.initial_g,
                remaining,
                remaining,
            ],
        )?;

        Ok(Filament {
            id: conn.last_insert_rowid(),
            name: draft.name.clone(),
            color: draft.color.clone(),
            material: draft.material.clone(),
            price: draft.price,
            initial_g: draft.initial_g,
            remaining_g_effective: remaining,
            remaining_g_projected: remaining,
        })
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Filament>> {
        let conn = self.get_conn()?;
        let filament = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(filament)
    }

    /// 查询全部耗材
    pub fn list_all(&self) -> RepositoryResult<Vec<Filament>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
        let filaments = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(filaments)
    }

    /// 查询预测库存为负的耗材
    pub fn list_projected_shortages(&self) -> RepositoryResult<Vec<Filament>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE remaining_g_projected < 0 ORDER BY remaining_g_projected ASC",
            SELECT_COLUMNS
        ))?;
        let filaments = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(filaments)
    }

    /// 更新主数据字段，库存调整以流水形式写入
    ///
    /// # 参数
    /// - `filament`: 新的主数据 (计数器字段忽略)
    /// - `adjustment`: 可选的库存调整流水
    pub fn update_with_adjustment(
        &self,
        filament: &Filament,
        adjustment: Option<&InventoryMovement>,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let affected = tx.execute(
            r#"
            UPDATE filaments
            SET name = ?1, color = ?2, material = ?3, price = ?4, initial_g = ?5
            WHERE id = ?6
            "#,
            params![
                filament.name,
                filament.color,
                filament.material,
                filament.price,
                filament.initial_g,
                filament.id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Filament", filament.id));
        }

        if let Some(movement) = adjustment {
            record_movement(&tx, movement)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 删除耗材
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM filaments WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Filament", id));
        }
        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<Filament> {
    Ok(Filament {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        material: row.get(3)?,
        price: row.get(4)?,
        initial_g: row.get(5)?,
        remaining_g_effective: row.get(6)?,
        remaining_g_projected: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::MovementKind;
    use chrono::Utc;

    fn repo() -> FilamentRepository {
        FilamentRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn draft(name: &str) -> FilamentDraft {
        FilamentDraft {
            name: name.to_string(),
            color: "rojo".to_string(),
            material: "PETG".to_string(),
            price: 18_000,
            initial_g: 1000,
            remaining_g_effective: Some(750),
        }
    }

    #[test]
    fn test_insert_sets_projected_to_effective() {
        let repo = repo();
        let f = repo.insert(&draft("PETG Rojo")).unwrap();
        assert_eq!(f.remaining_g_effective, 750);
        assert_eq!(f.remaining_g_projected, 750);

        let found = repo.find_by_id(f.id).unwrap().unwrap();
        assert_eq!(found, f);
        assert!(repo.find_by_id(f.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_update_with_adjustment_is_atomic() {
        let repo = repo();
        let mut f = repo.insert(&draft("PETG Rojo")).unwrap();
        f.name = "PETG Rojo Mate".to_string();

        let adjust = InventoryMovement::new(None, f.id, MovementKind::Adjust, 50, 50, Utc::now().naive_utc());
        repo.update_with_adjustment(&f, Some(&adjust)).unwrap();

        let found = repo.find_by_id(f.id).unwrap().unwrap();
        assert_eq!(found.name, "PETG Rojo Mate");
        assert_eq!(found.remaining_g_effective, 800);
        assert_eq!(found.remaining_g_projected, 800);

        // 调整流水指向不存在的耗材时整个事务回滚
        f.name = "no debe guardarse".to_string();
        let bad = InventoryMovement::new(None, 999, MovementKind::Adjust, 1, 1, Utc::now().naive_utc());
        assert!(repo.update_with_adjustment(&f, Some(&bad)).is_err());
        assert_eq!(repo.find_by_id(f.id).unwrap().unwrap().name, "PETG Rojo Mate");
    }

    #[test]
    fn test_delete_and_list() {
        let repo = repo();
        let a = repo.insert(&draft("A")).unwrap();
        let b = repo.insert(&draft("B")).unwrap();
        assert_eq!(repo.list_all().unwrap().len(), 2);

        repo.delete(a.id).unwrap();
        let rest = repo.list_all().unwrap();
        assert_eq!(rest, vec![b]);
        assert!(matches!(repo.delete(a.id), Err(RepositoryError::NotFound { .. })));
    }
}
