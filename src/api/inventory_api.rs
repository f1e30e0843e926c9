// ==========================================
// 3D 打印工坊台账 - 耗材库存 API
// ==========================================
// 职责: 库存缺口查询、库存流水查询、流水对账
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{Filament, InventoryMovement};
use crate::engine::{FilamentBalance, InventoryProjector};
use crate::repository::{FilamentRepository, MovementRepository};

// ==========================================
// 响应类型
// ==========================================

/// 库存缺口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilamentShortage {
    pub filament_id: i64,
    pub name: String,
    pub color: String,
    pub remaining_g_effective: i64,
    pub remaining_g_projected: i64,
    pub shortage_g: i64,
}

impl From<&Filament> for FilamentShortage {
    fn from(f: &Filament) -> Self {
        let balance = FilamentBalance::of(f);
        Self {
            filament_id: f.id,
            name: f.name.clone(),
            color: f.color.clone(),
            remaining_g_effective: f.remaining_g_effective,
            remaining_g_projected: f.remaining_g_projected,
            shortage_g: balance.shortage_g(),
        }
    }
}

/// 流水对账结果
///
/// 流水只记录系统产生的增量，建档时的初始库存不在流水中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub filament_id: i64,
    pub movement_count: usize,
    pub net_effective_g: i64,
    pub net_projected_g: i64,
    /// 当前被进行中任务预留的克数
    pub reserved_g: i64,
}

// ==========================================
// InventoryApi - 耗材库存 API
// ==========================================
pub struct InventoryApi {
    filament_repo: Arc<FilamentRepository>,
    movement_repo: Arc<MovementRepository>,
    projector: InventoryProjector,
}

impl InventoryApi {
    pub fn new(filament_repo: Arc<FilamentRepository>, movement_repo: Arc<MovementRepository>) -> Self {
        Self {
            filament_repo,
            movement_repo,
            projector: InventoryProjector::new(),
        }
    }

    /// 预测库存为负的耗材 (缺口大的在前)
    pub fn list_shortages(&self) -> ApiResult<Vec<FilamentShortage>> {
        let filaments = self.filament_repo.list_projected_shortages()?;
        Ok(filaments.iter().map(FilamentShortage::from).collect())
    }

    /// 耗材库存流水
    pub fn list_movements(&self, filament_id: i64) -> ApiResult<Vec<InventoryMovement>> {
        self.require_filament(filament_id)?;
        Ok(self.movement_repo.list_by_filament(filament_id)?)
    }

    /// 汇总耗材流水净增量
    pub fn ledger_summary(&self, filament_id: i64) -> ApiResult<LedgerSummary> {
        let filament = self.require_filament(filament_id)?;
        let movements = self.movement_repo.list_by_filament(filament_id)?;
        let (net_effective_g, net_projected_g) = self.projector.net_delta(filament_id, &movements);

        Ok(LedgerSummary {
            filament_id,
            movement_count: movements.len(),
            net_effective_g,
            net_projected_g,
            reserved_g: filament.reserved_g(),
        })
    }

    fn require_filament(&self, filament_id: i64) -> ApiResult<Filament> {
        self.filament_repo
            .find_by_id(filament_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Filament(id={})不存在", filament_id)))
    }
}
