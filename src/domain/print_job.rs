// ==========================================
// 3D 打印工坊台账 - 打印任务领域模型
// ==========================================
// 职责: 打印队列中的任务记录
// 红线: 任务只关联对象/耗材/打印机 (外键ID)，不持有它们
// ==========================================

use crate::domain::types::JobStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 单个任务数量上限
pub const MAX_JOB_QUANTITY: i64 = 100;

// ==========================================
// PrintJob - 打印任务
// ==========================================
// 对齐: print_jobs 表
// 说明: 关联主数据被删除后对应外键为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: i64,
    pub object_id: Option<i64>,
    pub filament_id: Option<i64>,
    pub printer_id: Option<i64>,

    pub quantity: i64,
    pub hours: f64,           // 总时长 = 单件时长 × 数量
    pub filament_used_g: i64, // 总用料 = 单件克重 × 数量

    pub status: JobStatus,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>, // 仅在完成时写入
}

// ==========================================
// NewPrintJob - 待入库的新任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrintJob {
    pub object_id: i64,
    pub filament_id: i64,
    pub printer_id: i64,
    pub quantity: i64,
    pub hours: f64,
    pub filament_used_g: i64,
    pub status: JobStatus,
    pub created_at: NaiveDateTime,
}

impl NewPrintJob {
    /// 入库后补齐 ID
    pub fn with_id(self, id: i64) -> PrintJob {
        PrintJob {
            id,
            object_id: Some(self.object_id),
            filament_id: Some(self.filament_id),
            printer_id: Some(self.printer_id),
            quantity: self.quantity,
            hours: self.hours,
            filament_used_g: self.filament_used_g,
            status: self.status,
            created_at: self.created_at,
            completed_at: None,
        }
    }
}

// ==========================================
// PrintJobView - 队列列表行
// ==========================================
// 用途: 队列展示 (对象名/耗材名可能已被删除)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJobView {
    pub job: PrintJob,
    pub object_name: Option<String>,
    pub filament_name: Option<String>,
    pub printer_name: Option<String>,
}
