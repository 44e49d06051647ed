// ==========================================
// D.O.A 退货处置系统 - 操作日志仓储
// ==========================================
// 红线: 所有写入必须记录, 日志只追加
// ==========================================

mod core;
mod queries;


pub use self::core::ActionLogRepository;
