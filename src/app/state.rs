// ==========================================
// 3D 打印工坊台账 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// 启动顺序: 打开连接 → 幂等建表 → 确保全局配置存在 → 装配 API
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, FilamentApi, InventoryApi, ObjectApi, PrinterApi, QueueApi};
use crate::config::{AppConfig, ENV_DB_PATH};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{
    FilamentRepository, GlobalConfigRepository, MovementRepository, ObjectRepository,
    PrintJobRepository, PrinterRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub filament_api: Arc<FilamentApi>,
    pub printer_api: Arc<PrinterApi>,
    pub object_api: Arc<ObjectApi>,
    pub queue_api: Arc<QueueApi>,
    pub inventory_api: Arc<InventoryApi>,
    pub config_api: Arc<ConfigApi>,

    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// 按进程配置创建 AppState，并切换界面语言
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        crate::i18n::set_locale(&config.locale);
        Self::new(config.db_path.clone())
    }

    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径 (不存在时自动创建)
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let filament_repo = Arc::new(FilamentRepository::new(conn.clone()));
        let printer_repo = Arc::new(PrinterRepository::new(conn.clone()));
        let object_repo = Arc::new(ObjectRepository::new(conn.clone()));
        let print_job_repo = Arc::new(PrintJobRepository::new(conn.clone()));
        let movement_repo = Arc::new(MovementRepository::new(conn.clone()));
        let config_repo = Arc::new(GlobalConfigRepository::new(conn.clone()));

        // 全局配置单例: 启动时显式创建
        let global_config = config_repo
            .ensure()
            .map_err(|e| format!("无法初始化全局配置: {}", e))?;
        tracing::debug!(?global_config, "全局配置已加载");

        // ==========================================
        // 初始化API层
        // ==========================================
        let config_api = Arc::new(ConfigApi::new(
            config_repo,
            filament_repo.clone(),
            printer_repo.clone(),
        ));
        let filament_api = Arc::new(FilamentApi::new(filament_repo.clone(), print_job_repo.clone()));
        let printer_api = Arc::new(PrinterApi::new(printer_repo.clone(), print_job_repo.clone()));
        let object_api = Arc::new(ObjectApi::new(
            object_repo.clone(),
            print_job_repo.clone(),
            config_api.clone(),
        ));
        let queue_api = Arc::new(QueueApi::new(
            print_job_repo,
            object_repo,
            filament_repo.clone(),
            printer_repo,
        ));
        let inventory_api = Arc::new(InventoryApi::new(filament_repo, movement_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            filament_api,
            printer_api,
            object_api,
            queue_api,
            inventory_api,
            config_api,
            conn,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// 共享连接 (供运维脚本使用)
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 PRINT_SHOP_DB_PATH (非空时)
/// - 开发环境: 用户数据目录/print-shop-ledger-dev/print_shop.db
/// - 生产环境: 用户数据目录/print-shop-ledger/print_shop.db
/// - 无用户数据目录时: ./print_shop.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./print_shop.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("print-shop-ledger-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("print-shop-ledger");

        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("print_shop.db");
        } else {
            tracing::warn!(dir = %dir.display(), "无法创建数据目录，使用当前目录");
        }
    }

    path.to_string_lossy().to_string()
}
