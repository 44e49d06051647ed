// ==========================================
// D.O.A 退货处置系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据存取接口, 屏蔽存储细节
// 存储: 进程内存（无持久化）
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod return_record_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use return_record_repo::{ReturnRecordRepository, StageTransition};
