// ==========================================
// D.O.A 退货处置系统 - 引擎层错误类型
// ==========================================
// 职责: 流程规则拒绝原因（枚举越界、非法流转、终态保护）
// ==========================================

use thiserror::Error;

/// 流程规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("无效等级: {0}（仅支持 A/B/C/D）")]
    InvalidGrade(String),

    #[error("无效分配目标: {0}（仅支持 WSK/DG）")]
    InvalidTarget(String),

    #[error("无效的状态转换: action={action}, from={from}")]
    InvalidTransition { from: String, action: String },

    #[error("记录已处于终态: id={id}")]
    TerminalState { id: String },

    #[error("记录尚未定级: id={id}")]
    Ungraded { id: String },
}

impl WorkflowError {
    pub(crate) fn invalid_transition(from: impl ToString, action: &str) -> Self {
        WorkflowError::InvalidTransition {
            from: from.to_string(),
            action: action.to_string(),
        }
    }
}

/// Result 类型别名
pub type WorkflowResult<T> = Result<T, WorkflowError>;
