// ==========================================
// 3D 打印工坊台账 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化; 多步写入在同一事务内完成
// ==========================================

pub mod error;
pub mod filament_repo;
pub mod global_config_repo;
pub mod movement_repo;
pub mod object_repo;
pub mod print_job_repo;
pub mod printer_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use filament_repo::FilamentRepository;
pub use global_config_repo::GlobalConfigRepository;
pub use movement_repo::MovementRepository;
pub use object_repo::ObjectRepository;
pub use print_job_repo::PrintJobRepository;
pub use printer_repo::PrinterRepository;

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// 时间戳存储格式 (UTC)
pub(crate) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub(crate) fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 获取共享连接
pub(crate) fn lock_conn(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}
