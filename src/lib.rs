// ==========================================
// 3D 打印工坊台账 - 核心库
// ==========================================
// 职责: 耗材库存、打印机资产、打印对象定价、打印队列
// 技术栈: Rust + SQLite
// 核心: 成本模型 + 任务生命周期驱动的耗材库存预测
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 成本模型与任务生命周期
pub mod engine;

// 配置层 - 进程配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{JobAction, JobStatus, MovementKind};

// 领域实体
pub use domain::{
    Filament, FilamentDraft, GlobalConfig, InventoryMovement, Object3D, ObjectDraft, PrintJob,
    PrintJobView, Printer, PrinterDraft,
};

// 引擎
pub use engine::{
    price_object, resolve_cost_parameters, CostParameters, FilamentBalance, InventoryProjector,
    JobLifecycleEngine, PriceQuote,
};

// API
pub use api::{ApiError, ApiResult, ConfigApi, FilamentApi, InventoryApi, ObjectApi, PrinterApi, QueueApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "3D 打印工坊台账";
