// ==========================================
// D.O.A 退货处置系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 将仓储/引擎/导入错误转换为展示层可读的错误
// 红线: 被拒绝的操作不修改记录, 错误必须说明原因
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::WorkflowError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 记录错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("记录ID重复: {0}")]
    DuplicateId(String),

    // ==========================================
    // 流程规则错误
    // ==========================================
    #[error("无效等级: {0}（仅支持 A/B/C/D）")]
    InvalidGrade(String),

    #[error("无效分配目标: {0}（仅支持 WSK/DG）")]
    InvalidTarget(String),

    #[error("无效的状态转换: action={action}, from={from}")]
    InvalidTransition { from: String, action: String },

    #[error("记录已处于终态: {0}")]
    TerminalState(String),

    #[error("记录尚未定级: {0}")]
    Ungraded(String),

    // ==========================================
    // 输入与数据错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("锁获取失败: {0}")]
    LockError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DuplicateId(id) => ApiError::DuplicateId(id),
            RepositoryError::TerminalState { id } => ApiError::TerminalState(id),
            RepositoryError::InconsistentStage { status, storage } => ApiError::InternalError(
                format!("状态与库位不一致: status={}, storage={}", status, storage),
            ),
            RepositoryError::LockError(msg) => ApiError::LockError(msg),
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 WorkflowError 转换
// ==========================================
impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidGrade(raw) => ApiError::InvalidGrade(raw),
            WorkflowError::InvalidTarget(raw) => ApiError::InvalidTarget(raw),
            WorkflowError::InvalidTransition { from, action } => {
                ApiError::InvalidTransition { from, action }
            }
            WorkflowError::TerminalState { id } => ApiError::TerminalState(id),
            WorkflowError::Ungraded { id } => ApiError::Ungraded(id),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
