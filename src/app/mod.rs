// ==========================================
// 3D 打印工坊台账 - 应用层
// ==========================================
// 职责: 打开数据库、装配仓储与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
