// ==========================================
// 3D 打印工坊台账 - 领域类型定义
// ==========================================
// 职责: 打印任务状态、处理动作、库存流水类型
// 存储: 状态/动作以字符串形式落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 打印任务状态 (Job Status)
// ==========================================
// 状态只向前推进: queued/pending → printing → done
// 或转入 cancelled; done/cancelled 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,    // 排队 (历史数据)
    Pending,   // 待打印
    Printing,  // 打印中
    Done,      // 已完成
    Cancelled, // 已取消
}

impl JobStatus {
    /// 从数据库字符串解析
    ///
    /// 历史数据中存在 "canceled" 拼写，同样映射为 Cancelled
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "queued" => Some(JobStatus::Queued),
            "pending" => Some(JobStatus::Pending),
            "printing" => Some(JobStatus::Printing),
            "done" => Some(JobStatus::Done),
            "cancelled" | "canceled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Pending => "pending",
            JobStatus::Printing => "printing",
            JobStatus::Done => "done",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// 是否仍占用耗材预留 (未结算)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobStatus::Queued | JobStatus::Pending | JobStatus::Printing
        )
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// 本地化显示名称
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("job_status.{}", self.to_db_str()))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 任务处理动作 (Job Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobAction {
    Printing,  // 开始打印
    Done,      // 完成
    Cancelled, // 取消 (可带已打印时长)
    Delete,    // 删除记录
}

impl JobAction {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "printing" => Some(JobAction::Printing),
            "done" => Some(JobAction::Done),
            "cancelled" | "canceled" => Some(JobAction::Cancelled),
            "delete" => Some(JobAction::Delete),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            JobAction::Printing => "printing",
            JobAction::Done => "done",
            JobAction::Cancelled => "cancelled",
            JobAction::Delete => "delete",
        }
    }

    /// 本地化显示名称
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("job_action.{}", self.to_db_str()))
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 库存流水类型 (Movement Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Reserve, // 创建任务: 扣减预测库存
    Release, // 取消/删除: 归还预测库存
    Consume, // 实际消耗: 扣减有效库存
    Adjust,  // 人工调整库存
}

impl MovementKind {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RESERVE" => Some(MovementKind::Reserve),
            "RELEASE" => Some(MovementKind::Release),
            "CONSUME" => Some(MovementKind::Consume),
            "ADJUST" => Some(MovementKind::Adjust),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            MovementKind::Reserve => "RESERVE",
            MovementKind::Release => "RELEASE",
            MovementKind::Consume => "CONSUME",
            MovementKind::Adjust => "ADJUST",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
