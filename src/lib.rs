// ==========================================
// D.O.A 退货处置系统 - 核心库
// ==========================================
// 流程: 入库 → 定级 → (送修 Mitracare | 直接清仓) → 清仓分配 WSK/DG
// 存储: 进程内存（无持久化）
// 系统定位: 运营看板后端 (人工确认每一步流转)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 流程规则
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AllocationTarget, DocumentKind, Grade, GradeRoute, ReturnStatus, StorageBucket,
};

// 领域实体
pub use domain::{
    ActionLog, ActionType, NewReturnRecord, ReturnDocument, ReturnRecord, ReturnRecordPatch,
};

// 引擎
pub use engine::{
    ClearanceAllocator, DoaAggregator, GradingEngine, ReturnEvent, ReturnEventPublisher,
    ServiceDispatch,
};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DoaApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "D.O.A 退货处置系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
