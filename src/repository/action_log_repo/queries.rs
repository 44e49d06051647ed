use super::core::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::RepositoryResult;

impl ActionLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let logs = self.get_logs()?;
        Ok(logs.iter().find(|l| l.action_id == action_id).cloned())
    }

    /// 查询某条退货记录的全部日志（按写入顺序）
    pub fn find_by_record_id(&self, record_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let logs = self.get_logs()?;
        Ok(logs
            .iter()
            .filter(|l| l.record_id == record_id)
            .cloned()
            .collect())
    }

    /// 按操作类型查询
    pub fn find_by_action_type(&self, action_type: ActionType) -> RepositoryResult<Vec<ActionLog>> {
        let logs = self.get_logs()?;
        Ok(logs
            .iter()
            .filter(|l| l.action_type == action_type)
            .cloned()
            .collect())
    }

    /// 最近 N 条日志（最新在前）
    pub fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let logs = self.get_logs()?;
        Ok(logs.iter().rev().take(limit).cloned().collect())
    }

    /// 日志总数
    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(self.get_logs()?.len())
    }
}
