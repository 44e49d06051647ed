// ==========================================
// D.O.A 退货处置系统 - 定级引擎
// ==========================================
// 职责: 根据损坏等级推导下一阶段与库位
// 规则: A/B → WaitingService, C/D → InClearance, 库位统一 Damage D.O.A
// 红线: 无状态、无副作用, 写入由仓储层原子完成
// ==========================================

use crate::domain::return_record::{ReturnRecord, StageChange};
use crate::domain::types::{Grade, GradeRoute, ReturnStatus, StorageBucket};
use crate::engine::error::{WorkflowError, WorkflowResult};

pub const ACTION_ASSIGN_GRADE: &str = "assign_grade";

// ==========================================
// GradingEngine - 定级引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct GradingEngine;

impl GradingEngine {
    pub fn new() -> Self {
        Self
    }

    /// 解析等级输入
    pub fn parse_grade(raw: &str) -> WorkflowResult<Grade> {
        Grade::parse(raw).ok_or_else(|| WorkflowError::InvalidGrade(raw.trim().to_string()))
    }

    /// 定级规则（纯函数）
    pub fn derive_stage(grade: Grade) -> StageChange {
        let status = match grade.route() {
            GradeRoute::Service => ReturnStatus::WaitingService,
            GradeRoute::Clearance => ReturnStatus::InClearance,
        };

        StageChange {
            grade: Some(grade),
            status,
            storage: StorageBucket::DamageDoa,
        }
    }

    /// 判定一次定级
    ///
    /// # 规则
    /// - Finished → TerminalState
    /// - 其余阶段 → 重新套用定级规则（后者覆盖, 同等级重复定级幂等）
    pub fn decide(&self, record: &ReturnRecord, grade: Grade) -> WorkflowResult<StageChange> {
        if record.status().is_terminal() {
            return Err(WorkflowError::TerminalState {
                id: record.id.clone(),
            });
        }
        Ok(Self::derive_stage(grade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::return_record::NewReturnRecord;
    use crate::engine::service_dispatch::ServiceDispatch;
    use crate::repository::ReturnRecordRepository;

    fn inbound_record() -> ReturnRecord {
        let repo = ReturnRecordRepository::new();
        inbound_into(&repo)
    }

    fn inbound_into(repo: &ReturnRecordRepository) -> ReturnRecord {
        repo.add(NewReturnRecord {
            id: Some("R1".to_string()),
            product: Some("iPhone 15".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_derive_stage_partition() {
        for grade in [Grade::A, Grade::B] {
            let stage = GradingEngine::derive_stage(grade);
            assert_eq!(stage.status, ReturnStatus::WaitingService);
            assert_eq!(stage.storage, StorageBucket::DamageDoa);
            assert_eq!(stage.grade, Some(grade));
        }
        for grade in [Grade::C, Grade::D] {
            let stage = GradingEngine::derive_stage(grade);
            assert_eq!(stage.status, ReturnStatus::InClearance);
            assert_eq!(stage.storage, StorageBucket::DamageDoa);
        }
    }

    #[test]
    fn test_parse_grade_invalid() {
        assert_eq!(
            GradingEngine::parse_grade("X"),
            Err(WorkflowError::InvalidGrade("X".to_string()))
        );
        assert_eq!(GradingEngine::parse_grade("b"), Ok(Grade::B));
    }

    #[test]
    fn test_decide_from_inbound() {
        let engine = GradingEngine::new();
        let record = inbound_record();
        let stage = engine.decide(&record, Grade::B).unwrap();
        assert_eq!(stage.status, ReturnStatus::WaitingService);
        assert!(stage.is_consistent());
    }

    #[test]
    fn test_decide_reapplies_rule_at_mitracare() {
        let repo = ReturnRecordRepository::new();
        inbound_into(&repo);
        let engine = GradingEngine::new();
        let dispatch = ServiceDispatch::new();

        repo.transition("R1", |r| engine.decide(r, Grade::A).map_err(ApiError::from))
            .unwrap();
        repo.transition("R1", |r| dispatch.decide_send(r).map_err(ApiError::from))
            .unwrap();

        let record = repo.get("R1").unwrap();
        assert_eq!(record.status(), ReturnStatus::AtMitracare);
        let stage = engine.decide(&record, Grade::C).unwrap();
        assert_eq!(stage.status, ReturnStatus::InClearance);
        assert_eq!(stage.storage, StorageBucket::DamageDoa);
        assert_eq!(stage.grade, Some(Grade::C));
    }
}
