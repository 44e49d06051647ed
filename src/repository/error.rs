// ==========================================
// D.O.A 退货处置系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 记录错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("记录ID重复: {0}")]
    DuplicateId(String),

    // ===== 流程约束错误 =====
    #[error("记录已处于终态, 不允许修改: id={id}")]
    TerminalState { id: String },

    #[error("状态与库位不一致: status={status}, storage={storage}")]
    InconsistentStage { status: String, storage: String },

    // ===== 并发控制错误 =====
    #[error("仓储锁获取失败: {0}")]
    LockError(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 退货记录未找到
    pub fn record_not_found(id: &str) -> Self {
        RepositoryError::NotFound {
            entity: "ReturnRecord".to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
