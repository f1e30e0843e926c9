// ==========================================
// 3D 打印工坊台账 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供展示层调用
// ==========================================

pub mod config_api;
pub mod error;
pub mod filament_api;
pub mod inventory_api;
pub mod object_api;
pub mod printer_api;
pub mod queue_api;
pub mod validator;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use filament_api::FilamentApi;
pub use inventory_api::{FilamentShortage, InventoryApi, LedgerSummary};
pub use object_api::{ObjectApi, ObjectUpdate, RepriceSummary};
pub use printer_api::PrinterApi;
pub use queue_api::{JobAdvanced, JobCreated, QueueApi};
pub use validator::MasterDataValidator;
