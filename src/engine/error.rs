// ==========================================
// 3D 打印工坊台账 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 引擎错误一律在任何写入之前返回
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 输入校验 =====
    #[error("数据验证失败: {0}")]
    Validation(String),

    #[error("无效的状态转换: from={from} action={action}")]
    InvalidTransition { from: String, action: String },

    // ===== 引用完整性 =====
    #[error("引用完整性错误: {entity} (job_id={job_id}) 已不存在")]
    ReferentialIntegrity { entity: String, job_id: i64 },

    // ===== 计算错误 =====
    #[error("除零错误: {0}")]
    DivisionByZero(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
