// ==========================================
// 3D 打印工坊台账 - 库存流水领域模型
// ==========================================
// 红线: 所有库存计数器变更必须记录流水
// 用途: 审计追踪，库存回溯
// ==========================================

use crate::domain::types::MovementKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// InventoryMovement - 库存流水
// ==========================================
// 对齐: inventory_movement 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub movement_id: String, // UUID
    pub job_id: Option<i64>, // 关联任务 (人工调整时为空)
    pub filament_id: i64,
    pub kind: MovementKind,

    // ===== 计数器增量 (负数为扣减) =====
    pub delta_effective_g: i64,
    pub delta_projected_g: i64,

    pub movement_ts: NaiveDateTime,
    pub detail: Option<String>,
    pub payload_json: Option<JsonValue>,
}

impl InventoryMovement {
    pub fn new(
        job_id: Option<i64>,
        filament_id: i64,
        kind: MovementKind,
        delta_effective_g: i64,
        delta_projected_g: i64,
        movement_ts: NaiveDateTime,
    ) -> Self {
        Self {
            movement_id: uuid::Uuid::new_v4().to_string(),
            job_id,
            filament_id,
            kind,
            delta_effective_g,
            delta_projected_g,
            movement_ts,
            detail: None,
            payload_json: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }
}
