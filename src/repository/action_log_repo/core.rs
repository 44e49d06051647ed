use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::{Mutex, MutexGuard};

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做存取
#[derive(Default)]
pub struct ActionLogRepository {
    logs: Mutex<Vec<ActionLog>>,
}

impl ActionLogRepository {
    /// 创建新的操作日志仓储
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取日志列表锁
    pub(super) fn get_logs(&self) -> RepositoryResult<MutexGuard<'_, Vec<ActionLog>>> {
        self.logs
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入
    /// - `Err(DuplicateId)`: action_id 已存在
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let mut logs = self.get_logs()?;

        if logs.iter().any(|l| l.action_id == log.action_id) {
            return Err(RepositoryError::DuplicateId(log.action_id.clone()));
        }

        logs.push(log.clone());
        Ok(log.action_id.clone())
    }
}
