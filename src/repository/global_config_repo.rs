// ==========================================
// 3D 打印工坊台账 - 全局配置仓储
// ==========================================
// 说明: 单例记录 (id=1)，启动时由 ensure() 创建
// 读取不隐式插入
// ==========================================

use crate::domain::GlobalConfig;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::lock_conn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SINGLETON_ID: i64 = 1;

pub struct GlobalConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GlobalConfigRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// 确保配置记录存在并返回
    ///
    /// 不存在时写入默认值
    pub fn ensure(&self) -> RepositoryResult<GlobalConfig> {
        {
            let conn = self.get_conn()?;
            let defaults = GlobalConfig::default();
            let inserted = conn.execute(
                r#"
                INSERT OR IGNORE INTO global_config (id, electricity_cost_kwh, profit_margin, use_manual)
                VALUES (?1, ?2, ?3, 0)
                "#,
                params![SINGLETON_ID, defaults.electricity_cost_kwh, defaults.profit_margin],
            )?;
            if inserted > 0 {
                tracing::info!("已写入默认全局配置");
            }
        }
        self.load()?
            .ok_or_else(|| RepositoryError::not_found("GlobalConfig", SINGLETON_ID))
    }

    /// 读取配置，未初始化时返回 None
    pub fn load(&self) -> RepositoryResult<Option<GlobalConfig>> {
        let conn = self.get_conn()?;
        let config = conn
            .query_row(
                r#"
                SELECT electricity_cost_kwh, profit_margin, manual_filament_cost,
                       manual_energy_cost, manual_printer_cost, manual_profit_margin, use_manual
                FROM global_config WHERE id = ?1
                "#,
                params![SINGLETON_ID],
                map_row,
            )
            .optional()?;
        Ok(config)
    }

    /// 保存配置 (整体覆盖)
    pub fn save(&self, config: &GlobalConfig) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO global_config (
                id, electricity_cost_kwh, profit_margin, manual_filament_cost,
                manual_energy_cost, manual_printer_cost, manual_profit_margin, use_manual
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                electricity_cost_kwh = excluded.electricity_cost_kwh,
                profit_margin = excluded.profit_margin,
                manual_filament_cost = excluded.manual_filament_cost,
                manual_energy_cost = excluded.manual_energy_cost,
                manual_printer_cost = excluded.manual_printer_cost,
                manual_profit_margin = excluded.manual_profit_margin,
                use_manual = excluded.use_manual
            "#,
            params![
                SINGLETON_ID,
                config.electricity_cost_kwh,
                config.profit_margin,
                config.manual_filament_cost,
                config.manual_energy_cost,
                config.manual_printer_cost,
                config.manual_profit_margin,
                config.use_manual,
            ],
        )?;
        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<GlobalConfig> {
    Ok(GlobalConfig {
        electricity_cost_kwh: row.get(0)?,
        profit_margin: row.get(1)?,
        manual_filament_cost: row.get(2)?,
        manual_energy_cost: row.get(3)?,
        manual_printer_cost: row.get(4)?,
        manual_profit_margin: row.get(5)?,
        use_manual: row.get(6)?,
    })
}
