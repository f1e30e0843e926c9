// ==========================================
// 3D 打印工坊台账 - 引擎层
// ==========================================
// 职责: 成本模型 + 任务生命周期 + 库存预测
// 红线: Engine 不拼 SQL, 不做持久化
// ==========================================

pub mod cost_model;
pub mod error;
pub mod inventory;
pub mod job_lifecycle;

// 重导出核心引擎
pub use cost_model::{
    price_components, price_object, resolve_cost_parameters, CostParameters, EnergyCostSource,
    PriceQuote,
};
pub use error::{EngineError, EngineResult};
pub use inventory::{FilamentBalance, InventoryProjector};
pub use job_lifecycle::{JobChange, JobCreationPlan, JobLifecycleEngine, JobTransitionPlan};
