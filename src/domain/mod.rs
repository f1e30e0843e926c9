// ==========================================
// 3D 打印工坊台账 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod filament;
pub mod global_config;
pub mod movement;
pub mod object3d;
pub mod print_job;
pub mod printer;
pub mod types;

// 重导出核心类型
pub use filament::{Filament, FilamentDraft};
pub use global_config::GlobalConfig;
pub use movement::InventoryMovement;
pub use object3d::{Object3D, ObjectDraft};
pub use print_job::{NewPrintJob, PrintJob, PrintJobView};
pub use printer::{Printer, PrinterDraft};
pub use types::{JobAction, JobStatus, MovementKind};
