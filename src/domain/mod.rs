// ==========================================
// D.O.A 退货处置系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod return_record;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use return_record::{
    NewReturnRecord, ReturnDocument, ReturnRecord, ReturnRecordPatch, StageChange,
};
pub use types::{AllocationTarget, DocumentKind, Grade, GradeRoute, ReturnStatus, StorageBucket};
