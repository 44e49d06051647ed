// ==========================================
// D.O.A 退货处置系统 - 引擎层
// ==========================================
// 职责: 实现流程规则（定级、送修、清仓分配、汇总）
// 红线: Engine 只计算阶段变更, 不直接写仓储
// ==========================================

pub mod aggregator;
pub mod clearance;
pub mod error;
pub mod events;
pub mod grading;
pub mod service_dispatch;

// 重导出核心引擎
pub use aggregator::{DoaAggregator, DoaOverview, GradeShare};
pub use clearance::ClearanceAllocator;
pub use error::{WorkflowError, WorkflowResult};
pub use events::{
    CallbackEventPublisher, NoOpEventPublisher, OptionalEventPublisher, ReturnEvent,
    ReturnEventPublisher, ReturnEventType,
};
pub use grading::GradingEngine;
pub use service_dispatch::ServiceDispatch;
