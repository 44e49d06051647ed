// ==========================================
// D.O.A 退货处置系统 - 配置层
// ==========================================
// 职责: 系统配置管理, 文件加载 + 运行时覆写
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, get_default_config_path, ConfigError, ConfigManager, ConfigResult,
};
