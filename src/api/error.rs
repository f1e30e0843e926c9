// ==========================================
// 3D 打印工坊台账 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换 Engine/Repository 错误为用户可读的错误消息
// 约束: 所有错误信息必须包含显式原因
// ==========================================

use crate::engine::EngineError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效的状态转换: from={from} action={action}")]
    InvalidStateTransition { from: String, action: String },

    /// 操作依赖的主数据已被删除，或主数据仍被进行中的任务引用
    #[error("引用完整性错误: {0}")]
    ReferentialIntegrity(String),

    #[error("除零错误: {0}")]
    DivisionByZero(String),

    // ==========================================
    // 数据校验错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 表单校验失败 (带逐字段原因)
    #[error("表单校验失败: {reason}")]
    DraftValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 是否为校验类错误 (调用方可提示用户修改输入)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::ValidationError(_)
                | ApiError::DraftValidationError { .. }
                | ApiError::InvalidStateTransition { .. }
                | ApiError::DivisionByZero(_)
        )
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => ApiError::ValidationError(msg),
            EngineError::InvalidTransition { from, action } => {
                ApiError::InvalidStateTransition { from, action }
            }
            EngineError::ReferentialIntegrity { entity, job_id } => ApiError::ReferentialIntegrity(
                format!("任务(id={})关联的{}已不存在", job_id, entity),
            ),
            EngineError::DivisionByZero(msg) => ApiError::DivisionByZero(msg),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户可读的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ReferentialIntegrity(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// 字段名
    pub field: String,
    /// 违规原因
    pub reason: String,
}

impl ValidationViolation {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
