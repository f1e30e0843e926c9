// ==========================================
// 3D 打印工坊台账 - 耗材领域模型
// ==========================================
// 职责: 耗材主数据 + 双库存计数器
// 红线: 有效库存只在实际消耗时扣减; 预测库存在任务创建时预留
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Filament - 耗材
// ==========================================
// 对齐: filaments 表
// 说明: 两个计数器均为有符号整数，允许为负 (超额预留/超额消耗)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filament {
    pub id: i64,
    pub name: String,     // 名称
    pub color: String,    // 颜色
    pub material: String, // 材质 (PLA/PETG/...)
    pub price: i64,       // 整卷价格 (对应 initial_g)
    pub initial_g: i64,   // 初始克重

    // ===== 库存计数器 =====
    pub remaining_g_effective: i64, // 有效剩余 (已完成消耗后)
    pub remaining_g_projected: i64, // 预测剩余 (扣除排队/打印中预留)
}

impl Filament {
    /// 每克单价
    ///
    /// initial_g ≤ 0 时返回 None (无法折算)
    pub fn price_per_gram(&self) -> Option<f64> {
        if self.initial_g <= 0 {
            return None;
        }
        Some(self.price as f64 / self.initial_g as f64)
    }

    /// 当前被排队/打印中任务预留的克数
    pub fn reserved_g(&self) -> i64 {
        self.remaining_g_effective - self.remaining_g_projected
    }
}

// ==========================================
// FilamentDraft - 耗材录入表单
// ==========================================
// remaining_g_effective 为空时按 initial_g 入库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilamentDraft {
    pub name: String,
    pub color: String,
    pub material: String,
    pub price: i64,
    pub initial_g: i64,
    pub remaining_g_effective: Option<i64>,
}

impl FilamentDraft {
    /// 去除首尾空白后的副本
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
            material: self.material.trim().to_string(),
            ..self.clone()
        }
    }
}
