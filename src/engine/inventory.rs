// ==========================================
// 3D 打印工坊台账 - 库存预测
// ==========================================
// 职责: 将库存流水叠加到耗材计数器，给出变更后的结余与缺口
// 约定: 计数器不做截断，允许为负; 负的预测库存即为缺口
// ==========================================

use crate::domain::{Filament, InventoryMovement};
use serde::{Deserialize, Serialize};

// ==========================================
// FilamentBalance - 耗材结余
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilamentBalance {
    pub filament_id: i64,
    pub remaining_g_effective: i64,
    pub remaining_g_projected: i64,
}

impl FilamentBalance {
    pub fn of(filament: &Filament) -> Self {
        Self {
            filament_id: filament.id,
            remaining_g_effective: filament.remaining_g_effective,
            remaining_g_projected: filament.remaining_g_projected,
        }
    }

    /// 预测库存缺口 (克)，无缺口时为 0
    pub fn shortage_g(&self) -> i64 {
        (-self.remaining_g_projected).max(0)
    }

    pub fn is_short(&self) -> bool {
        self.shortage_g() > 0
    }
}

// ==========================================
// InventoryProjector - 库存预测器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryProjector;

impl InventoryProjector {
    pub fn new() -> Self {
        Self
    }

    /// 叠加流水，只计入属于该耗材的记录
    pub fn apply(&self, balance: FilamentBalance, movements: &[InventoryMovement]) -> FilamentBalance {
        movements
            .iter()
            .filter(|m| m.filament_id == balance.filament_id)
            .fold(balance, |acc, m| FilamentBalance {
                remaining_g_effective: acc.remaining_g_effective + m.delta_effective_g,
                remaining_g_projected: acc.remaining_g_projected + m.delta_projected_g,
                ..acc
            })
    }

    /// 汇总流水的净增量 (有效, 预测)
    pub fn net_delta(&self, filament_id: i64, movements: &[InventoryMovement]) -> (i64, i64) {
        movements
            .iter()
            .filter(|m| m.filament_id == filament_id)
            .fold((0, 0), |(eff, proj), m| {
                (eff + m.delta_effective_g, proj + m.delta_projected_g)
            })
    }
}
