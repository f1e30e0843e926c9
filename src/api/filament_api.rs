// ==========================================
// 3D 打印工坊台账 - 耗材管理 API
// ==========================================
// 职责: 耗材主数据 CRUD
// 红线: 人工修改有效库存时，预测库存同步平移 (保留未结算预留)
// ==========================================

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::MasterDataValidator;
use crate::domain::{Filament, FilamentDraft, InventoryMovement, MovementKind};
use crate::repository::{FilamentRepository, PrintJobRepository};

// ==========================================
// FilamentApi - 耗材管理 API
// ==========================================
pub struct FilamentApi {
    filament_repo: Arc<FilamentRepository>,
    print_job_repo: Arc<PrintJobRepository>,
    validator: MasterDataValidator,
}

impl FilamentApi {
    pub fn new(
        filament_repo: Arc<FilamentRepository>,
        print_job_repo: Arc<PrintJobRepository>,
    ) -> Self {
        Self {
            filament_repo,
            print_job_repo,
            validator: MasterDataValidator::new(),
        }
    }

    /// 新增耗材
    ///
    /// 有效剩余未填写时取初始克重; 预测库存与有效库存相同
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create_filament(&self, draft: &FilamentDraft) -> ApiResult<Filament> {
        let draft = draft.normalized();
        self.validator.validate_filament(&draft)?;

        let filament = self.filament_repo.insert(&draft)?;
        info!(filament_id = filament.id, remaining_g = filament.remaining_g_effective, "耗材已创建");
        Ok(filament)
    }

    /// 更新耗材
    ///
    /// 有效剩余变化量 delta 以 ADJUST 流水同时计入两个计数器
    #[instrument(skip(self, draft))]
    pub fn update_filament(&self, id: i64, draft: &FilamentDraft) -> ApiResult<Filament> {
        let draft = draft.normalized();
        self.validator.validate_filament(&draft)?;

        let existing = self.get_filament(id)?;
        let new_effective = draft
            .remaining_g_effective
            .unwrap_or(existing.remaining_g_effective);
        let delta = new_effective - existing.remaining_g_effective;

        let updated = Filament {
            name: draft.name,
            color: draft.color,
            material: draft.material,
            price: draft.price,
            initial_g: draft.initial_g,
            ..existing.clone()
        };

        let adjustment = (delta != 0).then(|| {
            InventoryMovement::new(None, id, MovementKind::Adjust, delta, delta, Utc::now().naive_utc())
                .with_detail("人工调整有效库存")
                .with_payload(json!({
                    "previous_effective_g": existing.remaining_g_effective,
                    "new_effective_g": new_effective,
                }))
        });

        self.filament_repo
            .update_with_adjustment(&updated, adjustment.as_ref())?;
        if delta != 0 {
            info!(filament_id = id, delta, "耗材库存已人工调整");
        }

        self.get_filament(id)
    }

    /// 删除耗材
    ///
    /// # 错误
    /// - ReferentialIntegrity: 仍有进行中的任务引用该耗材
    #[instrument(skip(self))]
    pub fn delete_filament(&self, id: i64) -> ApiResult<()> {
        let active = self.print_job_repo.active_ids_by_filament(id)?;
        if !active.is_empty() {
            return Err(ApiError::ReferentialIntegrity(format!(
                "耗材(id={})仍被进行中的任务引用: {:?}",
                id, active
            )));
        }
        self.filament_repo.delete(id)?;
        info!(filament_id = id, "耗材已删除");
        Ok(())
    }

    pub fn get_filament(&self, id: i64) -> ApiResult<Filament> {
        self.filament_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Filament(id={})不存在", id)))
    }

    pub fn list_filaments(&self) -> ApiResult<Vec<Filament>> {
        Ok(self.filament_repo.list_all()?)
    }
}
