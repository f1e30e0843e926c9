// ==========================================
// 3D 打印工坊台账 - 进程配置层
// ==========================================
// 职责: 读取进程级配置 (数据库路径、界面语言)
// 说明: 业务配置 (电价/利润率) 存于 global_config 表，不在此处
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{AppConfig, ENV_DB_PATH, ENV_LOCALE};
