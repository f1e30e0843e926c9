// ==========================================
// 3D 打印工坊台账 - 打印队列 API
// ==========================================
// 职责: 任务创建、状态推进、队列查询
// 流程: 仓储读取 → 引擎生成计划 → 仓储单事务落库
// 红线: 校验失败/引用缺失时不产生任何写入
// ==========================================

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{JobAction, PrintJob, PrintJobView};
use crate::engine::{FilamentBalance, JobChange, JobLifecycleEngine};
use crate::repository::{FilamentRepository, ObjectRepository, PrintJobRepository, PrinterRepository};

// ==========================================
// 响应类型
// ==========================================

/// 任务创建结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCreated {
    pub job: PrintJob,
    pub balance: FilamentBalance,
    /// 预测库存缺口 (克)，0 表示库存充足
    pub shortage_g: i64,
}

/// 状态推进结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAdvanced {
    /// 删除时为 None
    pub job: Option<PrintJob>,
    /// 终态任务删除不涉及耗材时为 None
    pub balance: Option<FilamentBalance>,
}

// ==========================================
// QueueApi - 打印队列 API
// ==========================================
pub struct QueueApi {
    print_job_repo: Arc<PrintJobRepository>,
    object_repo: Arc<ObjectRepository>,
    filament_repo: Arc<FilamentRepository>,
    printer_repo: Arc<PrinterRepository>,
    engine: JobLifecycleEngine,
}

impl QueueApi {
    pub fn new(
        print_job_repo: Arc<PrintJobRepository>,
        object_repo: Arc<ObjectRepository>,
        filament_repo: Arc<FilamentRepository>,
        printer_repo: Arc<PrinterRepository>,
    ) -> Self {
        Self {
            print_job_repo,
            object_repo,
            filament_repo,
            printer_repo,
            engine: JobLifecycleEngine::new(),
        }
    }

    /// 创建打印任务
    ///
    /// # 错误
    /// - ValidationError: 数量越界，或对象/耗材/打印机不存在
    ///
    /// # 说明
    /// 预测库存允许为负; 出现缺口时记录警告并在结果中返回缺口克数
    #[instrument(skip(self))]
    pub fn create_job(
        &self,
        object_id: i64,
        filament_id: i64,
        printer_id: i64,
        quantity: i64,
    ) -> ApiResult<JobCreated> {
        let object = self
            .object_repo
            .find_by_id(object_id)?
            .ok_or_else(|| ApiError::ValidationError(format!("打印对象(id={})不存在", object_id)))?;
        let filament = self
            .filament_repo
            .find_by_id(filament_id)?
            .ok_or_else(|| ApiError::ValidationError(format!("耗材(id={})不存在", filament_id)))?;
        let printer = self
            .printer_repo
            .find_by_id(printer_id)?
            .ok_or_else(|| ApiError::ValidationError(format!("打印机(id={})不存在", printer_id)))?;

        let plan = self.engine.plan_creation(
            &object,
            &filament,
            &printer,
            quantity,
            Utc::now().naive_utc(),
        )?;

        let job = self
            .print_job_repo
            .create_with_movements(&plan.job, &plan.movements)?;

        let shortage_g = plan.balance_after.shortage_g();
        if shortage_g > 0 {
            warn!(
                job_id = job.id,
                filament_id,
                shortage_g,
                remaining_g_projected = plan.balance_after.remaining_g_projected,
                "耗材预测库存不足"
            );
        }
        info!(
            job_id = job.id,
            filament_used_g = job.filament_used_g,
            hours = job.hours,
            "打印任务已创建"
        );

        Ok(JobCreated {
            job,
            balance: plan.balance_after,
            shortage_g,
        })
    }

    /// 推进任务状态
    ///
    /// # 参数
    /// - `partial_time`: 取消时已打印的小时数 (其他动作忽略)
    ///
    /// # 错误
    /// - NotFound: 任务不存在
    /// - InvalidStateTransition: 终态任务只能删除
    /// - ReferentialIntegrity: 任务关联的耗材已被删除
    /// - ValidationError: 已打印时长非法
    #[instrument(skip(self))]
    pub fn advance_job(
        &self,
        job_id: i64,
        action: JobAction,
        partial_time: Option<f64>,
    ) -> ApiResult<JobAdvanced> {
        let job = self.get_job(job_id)?;
        let filament = match job.filament_id {
            Some(id) => self.filament_repo.find_by_id(id)?,
            None => None,
        };

        let plan = self.engine.plan_transition(
            &job,
            filament.as_ref(),
            action,
            partial_time,
            Utc::now().naive_utc(),
        )?;
        self.print_job_repo.apply_transition(&plan)?;

        if let Some(balance) = plan.balance_after {
            if balance.is_short() {
                warn!(
                    job_id,
                    filament_id = balance.filament_id,
                    shortage_g = balance.shortage_g(),
                    "耗材预测库存不足"
                );
            }
        }
        info!(job_id, from = %job.status, action = %action, "任务状态已推进");

        let job = match plan.change {
            JobChange::Update(updated) => Some(updated),
            JobChange::Delete { .. } => None,
        };
        Ok(JobAdvanced {
            job,
            balance: plan.balance_after,
        })
    }

    pub fn get_job(&self, job_id: i64) -> ApiResult<PrintJob> {
        self.print_job_repo
            .find_by_id(job_id)?
            .ok_or_else(|| ApiError::NotFound(format!("PrintJob(id={})不存在", job_id)))
    }

    /// 打印队列: 排队/待打印/打印中的任务
    pub fn list_active(&self) -> ApiResult<Vec<PrintJobView>> {
        Ok(self.print_job_repo.list_active_views()?)
    }

    /// 全部任务 (含已完成/已取消)
    pub fn list_jobs(&self) -> ApiResult<Vec<PrintJob>> {
        Ok(self.print_job_repo.list_all()?)
    }
}
