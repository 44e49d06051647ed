// ==========================================
// D.O.A 退货处置系统 - 应用层
// ==========================================
// 职责: 装配仓储与API, 供展示层持有
// ==========================================

pub mod state;

// 重导出
pub use crate::config::get_default_config_path;
pub use state::AppState;
