// ==========================================
// 3D 打印工坊台账 - 打印机领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Printer - 打印机资产
// ==========================================
// 对齐: printers 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Printer {
    pub id: i64,
    pub name: String,
    pub price: i64,              // 购入价格
    pub wear_per_hour: f64,      // 折旧 (货币/小时)
    pub power_kwh_per_hour: f64, // 功耗 (kWh/小时)
}

/// 打印机录入表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterDraft {
    pub name: String,
    pub price: i64,
    pub wear_per_hour: f64,
    pub power_kwh_per_hour: f64,
}
