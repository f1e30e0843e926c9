// ==========================================
// 3D 打印工坊台账 - 打印任务生命周期引擎
// ==========================================
// 职责: 任务状态转换 → 耗材库存流水
// 红线: Engine 不拼 SQL; 只产出计划 (任务变更 + 流水)，由仓储在同一事务内落库
// ==========================================
// 转换规则:
// - 创建:   预测库存 -= 总用料 (RESERVE)，状态 pending
// - 打印中: 无库存影响
// - 完成:   有效库存 -= 总用料 (CONSUME)，写入 completed_at
// - 取消:   归还全部预留 (RELEASE); 若带已打印时长，再按比例从两个计数器扣减 (CONSUME)
// - 删除:   进行中的任务归还预留 (RELEASE); 终态任务只删除记录
// ==========================================

use crate::domain::print_job::MAX_JOB_QUANTITY;
use crate::domain::{
    Filament, InventoryMovement, JobAction, JobStatus, MovementKind, NewPrintJob, Object3D,
    PrintJob, Printer,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::inventory::{FilamentBalance, InventoryProjector};
use chrono::NaiveDateTime;
use serde_json::json;
use tracing::{debug, instrument};

// ==========================================
// 引擎输出
// ==========================================

/// 创建任务计划
///
/// movements 中的 job_id 为空，由仓储在插入任务后补齐
#[derive(Debug, Clone)]
pub struct JobCreationPlan {
    pub job: NewPrintJob,
    pub movements: Vec<InventoryMovement>,
    pub balance_after: FilamentBalance,
}

/// 任务记录变更
#[derive(Debug, Clone, PartialEq)]
pub enum JobChange {
    Update(PrintJob),
    Delete { job_id: i64 },
}

/// 状态转换计划
#[derive(Debug, Clone)]
pub struct JobTransitionPlan {
    pub change: JobChange,
    pub movements: Vec<InventoryMovement>,
    /// 终态任务删除时不涉及耗材，为 None
    pub balance_after: Option<FilamentBalance>,
}

// ==========================================
// JobLifecycleEngine - 任务生命周期引擎
// ==========================================
#[derive(Debug, Default)]
pub struct JobLifecycleEngine {
    projector: InventoryProjector,
}

impl JobLifecycleEngine {
    pub fn new() -> Self {
        Self {
            projector: InventoryProjector::new(),
        }
    }

    /// 规划新任务
    ///
    /// 校验全部在产出计划前完成，失败时无任何副作用
    #[instrument(skip(self, object, filament, printer), fields(object_id = object.id, filament_id = filament.id, printer_id = printer.id))]
    pub fn plan_creation(
        &self,
        object: &Object3D,
        filament: &Filament,
        printer: &Printer,
        quantity: i64,
        now: NaiveDateTime,
    ) -> EngineResult<JobCreationPlan> {
        if !(1..=MAX_JOB_QUANTITY).contains(&quantity) {
            return Err(EngineError::Validation(format!(
                "任务数量必须在 1..={} 之间: {}",
                MAX_JOB_QUANTITY, quantity
            )));
        }
        if object.weight_grams < 0 || object.print_time_hours < 0.0 {
            return Err(EngineError::Validation(format!(
                "对象参数非法: weight_grams={}, print_time_hours={}",
                object.weight_grams, object.print_time_hours
            )));
        }

        let hours = object.print_time_hours * quantity as f64;
        let filament_used_g = object
            .weight_grams
            .checked_mul(quantity)
            .filter(|used| filament.remaining_g_projected.checked_sub(*used).is_some())
            .ok_or_else(|| {
                EngineError::Validation(format!(
                    "耗材用量超出可表示范围: weight_grams={} × quantity={}",
                    object.weight_grams, quantity
                ))
            })?;

        let job = NewPrintJob {
            object_id: object.id,
            filament_id: filament.id,
            printer_id: printer.id,
            quantity,
            hours,
            filament_used_g,
            status: JobStatus::Pending,
            created_at: now,
        };

        let movements = vec![InventoryMovement::new(
            None,
            filament.id,
            MovementKind::Reserve,
            0,
            -filament_used_g,
            now,
        )
        .with_detail(format!("预留耗材: {} × {}", object.name, quantity))
        .with_payload(json!({
            "object_id": object.id,
            "printer_id": printer.id,
            "quantity": quantity,
            "filament_used_g": filament_used_g,
            "hours": hours,
        }))];

        let balance_after = self.projector.apply(FilamentBalance::of(filament), &movements);
        debug!(filament_used_g, hours, "任务创建计划已生成");

        Ok(JobCreationPlan {
            job,
            movements,
            balance_after,
        })
    }

    /// 规划状态转换
    ///
    /// # 参数
    /// - `filament`: 任务关联的耗材，已被删除时传 None
    /// - `partial_time`: 取消时已打印的小时数，仅对 Cancelled 生效
    ///
    /// # 错误
    /// - InvalidTransition: 终态任务只能删除
    /// - ReferentialIntegrity: 需要耗材但耗材已不存在
    /// - Validation: 已打印时长超过任务总时长，或耗材与任务不匹配
    #[instrument(skip(self, job, filament), fields(job_id = job.id, status = %job.status))]
    pub fn plan_transition(
        &self,
        job: &PrintJob,
        filament: Option<&Filament>,
        action: JobAction,
        partial_time: Option<f64>,
        now: NaiveDateTime,
    ) -> EngineResult<JobTransitionPlan> {
        // 终态任务: 预留已结算，删除只清理记录
        if job.status.is_terminal() {
            if action == JobAction::Delete {
                return Ok(JobTransitionPlan {
                    change: JobChange::Delete { job_id: job.id },
                    movements: Vec::new(),
                    balance_after: None,
                });
            }
            return Err(EngineError::InvalidTransition {
                from: job.status.to_string(),
                action: action.to_string(),
            });
        }

        let filament = self.resolve_filament(job, filament)?;
        let reserved = job.filament_used_g;
        let mut updated = job.clone();
        let mut movements = Vec::new();

        let change = match action {
            JobAction::Printing => {
                updated.status = JobStatus::Printing;
                JobChange::Update(updated)
            }
            JobAction::Done => {
                movements.push(
                    InventoryMovement::new(
                        Some(job.id),
                        filament.id,
                        MovementKind::Consume,
                        -reserved,
                        0,
                        now,
                    )
                    .with_detail("任务完成，扣减有效库存"),
                );
                updated.status = JobStatus::Done;
                updated.completed_at = Some(now);
                JobChange::Update(updated)
            }
            JobAction::Cancelled => {
                movements.push(
                    InventoryMovement::new(
                        Some(job.id),
                        filament.id,
                        MovementKind::Release,
                        0,
                        reserved,
                        now,
                    )
                    .with_detail("任务取消，归还预留"),
                );

                if let Some(used) = self.partial_consumption(job, partial_time)? {
                    let partial = partial_time.unwrap_or(0.0);
                    movements.push(
                        InventoryMovement::new(
                            Some(job.id),
                            filament.id,
                            MovementKind::Consume,
                            -used,
                            -used,
                            now,
                        )
                        .with_detail(format!("取消前已打印 {:.2} 小时", partial))
                        .with_payload(json!({
                            "partial_time": partial,
                            "job_hours": job.hours,
                            "filament_used_g": used,
                        })),
                    );
                    updated.hours = partial;
                    updated.filament_used_g = used;
                }

                updated.status = JobStatus::Cancelled;
                JobChange::Update(updated)
            }
            JobAction::Delete => {
                movements.push(
                    InventoryMovement::new(
                        Some(job.id),
                        filament.id,
                        MovementKind::Release,
                        0,
                        reserved,
                        now,
                    )
                    .with_detail("任务删除，归还预留"),
                );
                JobChange::Delete { job_id: job.id }
            }
        };

        let balance_after = self.projector.apply(FilamentBalance::of(filament), &movements);

        Ok(JobTransitionPlan {
            change,
            movements,
            balance_after: Some(balance_after),
        })
    }

    fn resolve_filament<'a>(
        &self,
        job: &PrintJob,
        filament: Option<&'a Filament>,
    ) -> EngineResult<&'a Filament> {
        let filament = match (job.filament_id, filament) {
            (Some(_), Some(f)) => f,
            _ => {
                return Err(EngineError::ReferentialIntegrity {
                    entity: "Filament".to_string(),
                    job_id: job.id,
                })
            }
        };
        if job.filament_id != Some(filament.id) {
            return Err(EngineError::Validation(format!(
                "耗材与任务不匹配: job.filament_id={:?}, filament.id={}",
                job.filament_id, filament.id
            )));
        }
        Ok(filament)
    }

    /// 取消时按已打印比例折算的实际用料 (四舍五入到克)
    ///
    /// 已打印时长 ≤ 0 或任务总时长为 0 时返回 None (全部归还)
    fn partial_consumption(
        &self,
        job: &PrintJob,
        partial_time: Option<f64>,
    ) -> EngineResult<Option<i64>> {
        let partial = match partial_time {
            Some(p) if p.is_nan() => {
                return Err(EngineError::Validation("已打印时长不是有效数字".to_string()))
            }
            Some(p) if p > 0.0 => p,
            _ => return Ok(None),
        };
        if job.hours <= 0.0 {
            return Ok(None);
        }
        if partial > job.hours {
            return Err(EngineError::Validation(format!(
                "已打印时长 {} 超过任务总时长 {}",
                partial, job.hours
            )));
        }

        let ratio = partial / job.hours;
        Ok(Some((job.filament_used_g as f64 * ratio).round() as i64))
    }
}
