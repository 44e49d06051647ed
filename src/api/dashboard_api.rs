// ==========================================
// D.O.A 退货处置系统 - 看板 API
// ==========================================
// 职责: 汇总统计（计数、等级分布、估值）与操作日志查询
// 红线: 只读; 每次调用基于仓储当前快照计算, 不缓存
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionLog;
use crate::domain::types::{Grade, ReturnStatus, StorageBucket};
use crate::engine::{DoaAggregator, DoaOverview, GradeShare};
use crate::repository::{ActionLogRepository, ReturnRecordRepository};

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 看板API
///
/// 职责：
/// 1. 状态/等级计数与已处置总数
/// 2. 总览卡片、等级分布、估值汇总
/// 3. 操作日志查询
/// 4. 库位审批分类
pub struct DashboardApi {
    record_repo: Arc<ReturnRecordRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    aggregator: DoaAggregator,
    approval_required: Vec<StorageBucket>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    ///
    /// # 参数
    /// - record_repo: 退货记录仓储
    /// - action_log_repo: 操作日志仓储
    /// - approval_required: 需要审批的库位（来自配置）
    pub fn new(
        record_repo: Arc<ReturnRecordRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        approval_required: Vec<StorageBucket>,
    ) -> Self {
        Self {
            record_repo,
            action_log_repo,
            aggregator: DoaAggregator::new(),
            approval_required,
        }
    }

    // ==========================================
    // 汇总统计
    // ==========================================

    /// 按状态计数（五个状态全部出现）
    pub fn count_by_status(&self) -> ApiResult<BTreeMap<ReturnStatus, usize>> {
        let records = self.record_repo.list_all()?;
        Ok(self.aggregator.count_by_status(&records))
    }

    /// 按等级计数（A-D 全部出现, 未定级不计入）
    pub fn count_by_grade(&self) -> ApiResult<BTreeMap<Grade, usize>> {
        let records = self.record_repo.list_all()?;
        Ok(self.aggregator.count_by_grade(&records))
    }

    /// 已处置数（库位 WSK/DG）
    pub fn total_finished(&self) -> ApiResult<usize> {
        let records = self.record_repo.list_all()?;
        Ok(self.aggregator.total_finished(&records))
    }

    /// 总览卡片
    pub fn overview(&self) -> ApiResult<DoaOverview> {
        let records = self.record_repo.list_all()?;
        let overview = self.aggregator.overview(&records);
        debug!(
            total = overview.total,
            at_service = overview.at_service,
            in_clearance = overview.in_clearance,
            finished = overview.finished,
            "看板总览"
        );
        Ok(overview)
    }

    /// 等级分布
    pub fn grade_distribution(&self) -> ApiResult<Vec<GradeShare>> {
        let records = self.record_repo.list_all()?;
        Ok(self.aggregator.grade_distribution(&records))
    }

    /// 按状态汇总不含税估值
    pub fn valuation_by_status(&self) -> ApiResult<BTreeMap<ReturnStatus, f64>> {
        let records = self.record_repo.list_all()?;
        Ok(self.aggregator.valuation_by_status(&records))
    }

    // ==========================================
    // 库位审批分类
    // ==========================================

    /// 库位是否需要审批（仅分类, 审批流程不在本系统内）
    pub fn requires_approval(&self, storage: &str) -> ApiResult<bool> {
        let bucket = StorageBucket::parse(storage)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知库位: {}", storage)))?;
        Ok(bucket.requires_approval(&self.approval_required))
    }

    // ==========================================
    // 操作日志查询
    // ==========================================

    /// 查询某条记录的操作日志（时间顺序）
    pub fn list_action_logs_by_record(&self, record_id: &str) -> ApiResult<Vec<ActionLog>> {
        if record_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        Ok(self.action_log_repo.find_by_record_id(record_id)?)
    }

    /// 最近操作（新 → 旧）
    pub fn recent_actions(&self, limit: usize) -> ApiResult<Vec<ActionLog>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit必须大于0".to_string()));
        }
        Ok(self.action_log_repo.find_recent(limit)?)
    }
}
