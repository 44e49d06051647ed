// ==========================================
// D.O.A 退货处置系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供展示层调用
// ==========================================

pub mod dashboard_api;
pub mod doa_api;
pub mod error;
pub mod import_api;
pub mod validator;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use doa_api::DoaApi;
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
