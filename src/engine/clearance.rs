// ==========================================
// D.O.A 退货处置系统 - 清仓分配
// ==========================================
// 职责: InClearance 记录的终态处置（WSK 可售 / DG 次品）
// 红线: Finished 之后不允许任何阶段变更
// ==========================================

use crate::domain::return_record::{ReturnRecord, StageChange};
use crate::domain::types::{AllocationTarget, ReturnStatus};
use crate::engine::error::{WorkflowError, WorkflowResult};

pub const ACTION_ALLOCATE: &str = "allocate";

#[derive(Debug, Clone, Copy, Default)]
pub struct ClearanceAllocator;

impl ClearanceAllocator {
    pub fn new() -> Self {
        Self
    }

    /// 解析分配目标
    pub fn parse_target(raw: &str) -> WorkflowResult<AllocationTarget> {
        AllocationTarget::parse(raw)
            .ok_or_else(|| WorkflowError::InvalidTarget(raw.trim().to_string()))
    }

    /// 判定终态分配
    ///
    /// # 规则
    /// - Finished → TerminalState
    /// - 非 InClearance → InvalidTransition
    /// - InClearance → Finished + 库位=目标
    pub fn decide(&self, record: &ReturnRecord, target: AllocationTarget) -> WorkflowResult<StageChange> {
        match record.status() {
            ReturnStatus::Finished => Err(WorkflowError::TerminalState {
                id: record.id.clone(),
            }),
            ReturnStatus::InClearance => {
                if record.grade().is_none() {
                    return Err(WorkflowError::Ungraded {
                        id: record.id.clone(),
                    });
                }
                Ok(StageChange {
                    grade: record.grade(),
                    status: ReturnStatus::Finished,
                    storage: target.storage(),
                })
            }
            other => Err(WorkflowError::invalid_transition(other, ACTION_ALLOCATE)),
        }
    }
}
