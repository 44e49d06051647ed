// ==========================================
// D.O.A 退货处置系统 - 送修调度
// ==========================================
// 状态机: WaitingService → AtMitracare → InClearance
// 说明: 两次人工确认操作, 无超时、无自动重试
// ==========================================

use crate::domain::return_record::{ReturnRecord, StageChange};
use crate::domain::types::{ReturnStatus, StorageBucket};
use crate::engine::error::{WorkflowError, WorkflowResult};

pub const ACTION_SEND_TO_SERVICE: &str = "send_to_service";
pub const ACTION_RECEIVE_FROM_SERVICE: &str = "receive_from_service";

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceDispatch;

impl ServiceDispatch {
    pub fn new() -> Self {
        Self
    }

    /// 送往 Mitracare：仅允许 WaitingService → AtMitracare, 库位不变
    pub fn decide_send(&self, record: &ReturnRecord) -> WorkflowResult<StageChange> {
        Self::ensure_status(record, ReturnStatus::WaitingService, ACTION_SEND_TO_SERVICE)?;

        Ok(StageChange {
            grade: record.grade(),
            status: ReturnStatus::AtMitracare,
            storage: record.storage(),
        })
    }

    /// 从 Mitracare 取回：仅允许 AtMitracare → InClearance, 库位 Clearance
    pub fn decide_receive(&self, record: &ReturnRecord) -> WorkflowResult<StageChange> {
        Self::ensure_status(record, ReturnStatus::AtMitracare, ACTION_RECEIVE_FROM_SERVICE)?;

        Ok(StageChange {
            grade: record.grade(),
            status: ReturnStatus::InClearance,
            storage: StorageBucket::Clearance,
        })
    }

    fn ensure_status(
        record: &ReturnRecord,
        expected: ReturnStatus,
        action: &str,
    ) -> WorkflowResult<()> {
        let current = record.status();
        if current.is_terminal() {
            return Err(WorkflowError::TerminalState {
                id: record.id.clone(),
            });
        }
        if current != expected {
            return Err(WorkflowError::invalid_transition(current, action));
        }
        if record.grade().is_none() {
            return Err(WorkflowError::Ungraded {
                id: record.id.clone(),
            });
        }
        Ok(())
    }
}
