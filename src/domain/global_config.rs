// ==========================================
// 3D 打印工坊台账 - 全局成本配置
// ==========================================
// 职责: 电价、利润率、人工覆盖值
// 说明: 单例记录，由启动流程显式创建后注入成本模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认电价 (货币/kWh)
pub const DEFAULT_ELECTRICITY_COST_KWH: f64 = 120.0;

/// 默认利润率 (%)，100% 即售价为成本两倍
pub const DEFAULT_PROFIT_MARGIN: f64 = 100.0;

// ==========================================
// GlobalConfig - 全局配置
// ==========================================
// 对齐: global_config 表 (id 固定为 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub electricity_cost_kwh: f64, // 电价
    pub profit_margin: f64,        // 利润率 (%)

    // ===== 人工覆盖值 (use_manual=true 时生效) =====
    pub manual_filament_cost: Option<f64>, // 每克成本
    pub manual_energy_cost: Option<f64>,   // 每小时电费
    pub manual_printer_cost: Option<f64>,  // 每小时折旧
    pub manual_profit_margin: Option<f64>, // 利润率

    pub use_manual: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            electricity_cost_kwh: DEFAULT_ELECTRICITY_COST_KWH,
            profit_margin: DEFAULT_PROFIT_MARGIN,
            manual_filament_cost: None,
            manual_energy_cost: None,
            manual_printer_cost: None,
            manual_profit_margin: None,
            use_manual: false,
        }
    }
}
