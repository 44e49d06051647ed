// ==========================================
// D.O.A 退货处置系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::{ApiResult, DashboardApi, DoaApi, ImportApi};
use crate::config::config_manager::ConfigManager;
use crate::engine::{OptionalEventPublisher, ReturnEventPublisher};
use crate::repository::{ActionLogRepository, ReturnRecordRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源, 由展示层持有
pub struct AppState {
    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 退货处置API
    pub doa_api: Arc<DoaApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 导入导出API
    pub import_api: Arc<ImportApi>,

    /// 退货记录仓储
    pub record_repo: Arc<ReturnRecordRepository>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例（不发布事件）
    pub fn new(config: ConfigManager) -> ApiResult<Self> {
        Self::build(config, OptionalEventPublisher::none())
    }

    /// 创建带事件发布者的AppState实例
    ///
    /// 展示层通过 publisher 订阅记录变更
    pub fn with_publisher(
        config: ConfigManager,
        publisher: Arc<dyn ReturnEventPublisher>,
    ) -> ApiResult<Self> {
        Self::build(config, OptionalEventPublisher::with_publisher(publisher))
    }

    /// 初始化顺序: 配置 → Repository → API
    fn build(config: ConfigManager, event_publisher: OptionalEventPublisher) -> ApiResult<Self> {
        let id_prefix = config.get_record_id_prefix()?;
        let id_width = config.get_record_id_width()?;
        let default_actor = config.get_default_actor()?;
        let approval_required = config.get_approval_required_buckets()?;
        let max_rows = config.get_import_max_rows()?;

        tracing::info!(
            id_prefix = %id_prefix,
            id_width = id_width,
            actor = %default_actor,
            publisher = event_publisher.is_configured(),
            "初始化AppState"
        );

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let record_repo = Arc::new(ReturnRecordRepository::with_id_format(&id_prefix, id_width));
        let action_log_repo = Arc::new(ActionLogRepository::new());

        // ==========================================
        // 初始化API层
        // ==========================================
        let doa_api = DoaApi::new(
            record_repo.clone(),
            action_log_repo.clone(),
            Arc::new(event_publisher),
            default_actor,
        );
        let import_api = Arc::new(ImportApi::new(doa_api.clone(), max_rows));
        let dashboard_api = Arc::new(DashboardApi::new(
            record_repo.clone(),
            action_log_repo.clone(),
            approval_required,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            config: Arc::new(config),
            doa_api: Arc::new(doa_api),
            dashboard_api,
            import_api,
            record_repo,
            action_log_repo,
        })
    }
}
