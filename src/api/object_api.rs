// ==========================================
// 3D 打印工坊台账 - 打印对象 API
// ==========================================
// 职责: 打印对象 CRUD + 定价
// 红线: 新增/修改时按当前定价参数重算成本与建议售价
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::config_api::ConfigApi;
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::MasterDataValidator;
use crate::domain::{Object3D, ObjectDraft};
use crate::engine::{price_components, price_object, CostParameters, PriceQuote};
use crate::repository::{ObjectRepository, PrintJobRepository};

// ==========================================
// 响应类型
// ==========================================

/// 对象更新结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectUpdate {
    Updated(Object3D),
    /// 表单与已存记录一致，未写库
    Unchanged(Object3D),
}

/// 批量重算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepriceSummary {
    pub total: usize,
    /// 价格实际发生变化的对象数
    pub changed: usize,
    /// 参数非法而跳过的对象 id
    pub skipped: Vec<i64>,
    pub params: CostParameters,
}

// ==========================================
// ObjectApi - 打印对象 API
// ==========================================
pub struct ObjectApi {
    object_repo: Arc<ObjectRepository>,
    print_job_repo: Arc<PrintJobRepository>,
    config_api: Arc<ConfigApi>,
    validator: MasterDataValidator,
}

impl ObjectApi {
    pub fn new(
        object_repo: Arc<ObjectRepository>,
        print_job_repo: Arc<PrintJobRepository>,
        config_api: Arc<ConfigApi>,
    ) -> Self {
        Self {
            object_repo,
            print_job_repo,
            config_api,
            validator: MasterDataValidator::new(),
        }
    }

    /// 报价预览 (不落库)
    pub fn quote_draft(&self, draft: &ObjectDraft) -> ApiResult<PriceQuote> {
        self.validator.validate_object(draft)?;
        let params = self.config_api.get_cost_parameters()?;
        Ok(price_components(
            draft.weight_grams,
            draft.print_time_hours,
            draft.objects,
            &params,
        )?)
    }

    /// 新增打印对象
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create_object(&self, draft: &ObjectDraft) -> ApiResult<Object3D> {
        let draft = normalized(draft);
        let quote = self.quote_draft(&draft)?;
        let object = self
            .object_repo
            .insert(&draft, quote.unit_cost, quote.unit_suggested_price)?;
        info!(
            object_id = object.id,
            cost = object.cost,
            suggested_price = object.suggested_price,
            "打印对象已创建"
        );
        Ok(object)
    }

    /// 更新打印对象
    ///
    /// 表单无变化时返回 Unchanged，不重算不写库
    #[instrument(skip(self, draft))]
    pub fn update_object(&self, id: i64, draft: &ObjectDraft) -> ApiResult<ObjectUpdate> {
        let draft = normalized(draft);
        let existing = self.get_object(id)?;
        if existing.matches_draft(&draft) {
            return Ok(ObjectUpdate::Unchanged(existing));
        }

        let quote = self.quote_draft(&draft)?;
        let object = draft.into_object(id, quote.unit_cost, quote.unit_suggested_price);
        self.object_repo.update(&object)?;
        info!(object_id = id, cost = object.cost, "打印对象已更新");
        Ok(ObjectUpdate::Updated(object))
    }

    /// 删除打印对象
    ///
    /// # 错误
    /// - ReferentialIntegrity: 仍有进行中的任务引用该对象
    #[instrument(skip(self))]
    pub fn delete_object(&self, id: i64) -> ApiResult<()> {
        let active = self.print_job_repo.active_ids_by_object(id)?;
        if !active.is_empty() {
            return Err(ApiError::ReferentialIntegrity(format!(
                "打印对象(id={})仍被进行中的任务引用: {:?}",
                id, active
            )));
        }
        self.object_repo.delete(id)?;
        info!(object_id = id, "打印对象已删除");
        Ok(())
    }

    pub fn get_object(&self, id: i64) -> ApiResult<Object3D> {
        self.object_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Object3D(id={})不存在", id)))
    }

    pub fn list_objects(&self) -> ApiResult<Vec<Object3D>> {
        Ok(self.object_repo.list_all()?)
    }

    /// 按当前定价参数重算全部对象价格 (单事务写回)
    #[instrument(skip(self))]
    pub fn reprice_all(&self) -> ApiResult<RepriceSummary> {
        let params = self.config_api.get_cost_parameters()?;
        let objects = self.object_repo.list_all()?;

        let mut prices = Vec::with_capacity(objects.len());
        let mut skipped = Vec::new();
        for object in &objects {
            let quote = match price_object(object, &params) {
                Ok(quote) => quote,
                Err(e) => {
                    warn!(object_id = object.id, error = %e, "打印对象无法定价，已跳过");
                    skipped.push(object.id);
                    continue;
                }
            };
            if quote.unit_cost != object.cost || quote.unit_suggested_price != object.suggested_price {
                prices.push((object.id, quote.unit_cost, quote.unit_suggested_price));
            }
        }

        let changed = self.object_repo.update_prices(&prices)?;
        info!(
            total = objects.len(),
            changed,
            skipped = skipped.len(),
            "打印对象价格已重算"
        );

        Ok(RepriceSummary {
            total: objects.len(),
            changed,
            skipped,
            params,
        })
    }
}

fn normalized(draft: &ObjectDraft) -> ObjectDraft {
    ObjectDraft {
        name: draft.name.trim().to_string(),
        ..draft.clone()
    }
}
