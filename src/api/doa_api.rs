// ==========================================
// D.O.A 退货处置系统 - 退货处置 API
// ==========================================
// 职责: 展示层调用的命令与查询入口
// 流程: 校验输入 → 引擎判定 → 仓储原子写入 → ActionLog → 事件发布
// 红线: 被拒绝的操作不修改记录; 成功的写操作必须记录 ActionLog
// ==========================================

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::return_record::{
    NewReturnRecord, ReturnDocument, ReturnRecord, ReturnRecordPatch, StageChange,
};
use crate::domain::types::{DocumentKind, ReturnStatus};
use crate::engine::{
    ClearanceAllocator, GradingEngine, OptionalEventPublisher, ReturnEvent, ReturnEventType,
    ServiceDispatch,
};
use crate::importer::report::ImportReport;
use crate::repository::{ActionLogRepository, ReturnRecordRepository, StageTransition};

// ==========================================
// DoaApi - 退货处置 API
// ==========================================

/// 退货处置API
///
/// 职责：
/// 1. 入库、检验备注、文档追加
/// 2. 定级 / 送修 / 维修返回 / 清仓分配
/// 3. 文本检索与工作队列视图
/// 4. 批量入库（逐条报告结果）
///
/// 所有写操作以 `actor` 身份记录 ActionLog, 通过 [`DoaApi::for_actor`] 切换操作人。
#[derive(Clone)]
pub struct DoaApi {
    record_repo: Arc<ReturnRecordRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    grading: GradingEngine,
    dispatch: ServiceDispatch,
    allocator: ClearanceAllocator,
    event_publisher: Arc<OptionalEventPublisher>,
    actor: String,
}

impl DoaApi {
    /// 创建新的DoaApi实例
    ///
    /// # 参数
    /// - record_repo: 退货记录仓储
    /// - action_log_repo: 操作日志仓储
    /// - event_publisher: 事件发布者（可为空实例）
    /// - actor: 默认操作人
    pub fn new(
        record_repo: Arc<ReturnRecordRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        event_publisher: Arc<OptionalEventPublisher>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            record_repo,
            action_log_repo,
            grading: GradingEngine::new(),
            dispatch: ServiceDispatch::new(),
            allocator: ClearanceAllocator::new(),
            event_publisher,
            actor: actor.into(),
        }
    }

    /// 以指定操作人身份操作（共享同一仓储）
    pub fn for_actor(&self, actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            ..self.clone()
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    // ==========================================
    // 入库与检验备注
    // ==========================================

    /// 新增退货记录（Inbound / 无库位 / 未定级）
    ///
    /// # 返回
    /// - Err(DuplicateId): 调用方提供的ID已存在
    /// - Err(InvalidInput): 价格为负或文本超长
    pub fn add(&self, input: NewReturnRecord) -> ApiResult<ReturnRecord> {
        self.add_as(input, ActionType::Intake)
    }

    fn add_as(&self, input: NewReturnRecord, action_type: ActionType) -> ApiResult<ReturnRecord> {
        validator::validate_new_record(&input)?;

        let record = self.record_repo.add(input).map_err(|e| {
            warn!(actor = %self.actor, error = %e, "新增退货记录被拒绝");
            ApiError::from(e)
        })?;

        info!(record_id = %record.id, actor = %self.actor, "新增退货记录");
        self.write_action_log(
            &record.id,
            action_type,
            Some(json!({ "after": record.stage() })),
            record.product.clone(),
        );
        self.publish(&record, ReturnEventType::RecordAdded);

        Ok(record)
    }

    /// 修改检验备注（damage_type / description, 文档追加）
    ///
    /// # 返回
    /// - Err(NotFound): 记录不存在
    /// - Err(TerminalState): 记录已 Finished
    pub fn update(&self, id: &str, patch: ReturnRecordPatch) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;
        self.record_repo.get(id)?;
        validator::validate_patch(&patch)?;

        let payload = json!({
            "damage_type": patch.damage_type,
            "description": patch.description,
            "documents_appended": patch.documents.len(),
        });

        let record = self.record_repo.update(id, patch).map_err(|e| {
            warn!(record_id = %id, error = %e, "修改检验备注被拒绝");
            ApiError::from(e)
        })?;

        info!(record_id = %id, actor = %self.actor, "修改检验备注");
        self.write_action_log(id, ActionType::UpdateNotes, Some(payload), None);
        self.publish(&record, ReturnEventType::RecordUpdated);

        Ok(record)
    }

    /// 追加佐证文档（引用不透明, 不做格式校验）
    ///
    /// # 参数
    /// - kind: "approval_email" / "video" / "photo" 等
    /// - reference: 文件名或外部链接
    pub fn attach_document(&self, id: &str, kind: &str, reference: &str) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;
        validator::validate_reference(reference)?;
        let kind = DocumentKind::parse(kind)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知文档类型: {}", kind)))?;

        let document = ReturnDocument::new(kind, reference.trim());
        let payload = json!({
            "document_id": document.document_id,
            "kind": kind.as_str(),
            "reference": document.reference,
        });

        let patch = ReturnRecordPatch {
            documents: vec![document],
            ..Default::default()
        };
        let record = self.record_repo.update(id, patch).map_err(|e| {
            warn!(record_id = %id, error = %e, "追加文档被拒绝");
            ApiError::from(e)
        })?;

        info!(record_id = %id, kind = %kind, "追加佐证文档");
        self.write_action_log(id, ActionType::AttachDocument, Some(payload), None);
        self.publish(&record, ReturnEventType::DocumentAttached);

        Ok(record)
    }

    // ==========================================
    // 流程命令
    // ==========================================

    /// 定级
    ///
    /// A/B → WaitingService, C/D → InClearance, 库位 Damage D.O.A。
    /// 可重复定级（后者覆盖）; 仅 Finished 记录拒绝。
    pub fn assign_grade(&self, id: &str, grade: &str) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;
        let grade = GradingEngine::parse_grade(grade)?;

        let grading = self.grading;
        self.run_transition(id, ActionType::AssignGrade, ReturnEventType::GradeAssigned, |r| {
            grading.decide(r, grade).map_err(ApiError::from)
        })
    }

    /// 送往 Mitracare（WaitingService → AtMitracare）
    pub fn send_to_service(&self, id: &str) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;

        let dispatch = self.dispatch;
        self.run_transition(id, ActionType::SendToService, ReturnEventType::SentToService, |r| {
            dispatch.decide_send(r).map_err(ApiError::from)
        })
    }

    /// 从 Mitracare 取回（AtMitracare → InClearance / Clearance）
    pub fn receive_from_service(&self, id: &str) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;

        let dispatch = self.dispatch;
        self.run_transition(
            id,
            ActionType::ReceiveFromService,
            ReturnEventType::ReceivedFromService,
            |r| dispatch.decide_receive(r).map_err(ApiError::from),
        )
    }

    /// 清仓分配（InClearance → Finished / WSK|DG）
    pub fn allocate(&self, id: &str, target: &str) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;
        let target = ClearanceAllocator::parse_target(target)?;

        let allocator = self.allocator;
        self.run_transition(id, ActionType::Allocate, ReturnEventType::Allocated, |r| {
            allocator.decide(r, target).map_err(ApiError::from)
        })
    }

    /// 执行阶段变更并记录审计
    fn run_transition<F>(
        &self,
        id: &str,
        action_type: ActionType,
        event_type: ReturnEventType,
        decide: F,
    ) -> ApiResult<ReturnRecord>
    where
        F: FnOnce(&ReturnRecord) -> ApiResult<StageChange>,
    {
        let StageTransition { before, record } =
            self.record_repo.transition(id, decide).map_err(|e| {
                warn!(
                    record_id = %id,
                    action = %action_type,
                    error = %e,
                    "流程操作被拒绝"
                );
                e
            })?;

        info!(
            record_id = %id,
            action = %action_type,
            from = %before.status,
            to = %record.status(),
            storage = %record.storage(),
            actor = %self.actor,
            "流程阶段变更"
        );

        self.write_action_log(
            id,
            action_type,
            Some(json!({ "before": before, "after": record.stage() })),
            None,
        );
        self.publish(&record, event_type);

        Ok(record)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按ID查询
    pub fn get_record(&self, id: &str) -> ApiResult<ReturnRecord> {
        validator::validate_record_id(id)?;
        Ok(self.record_repo.get(id)?)
    }

    /// 全部记录（插入顺序）
    pub fn list_all(&self) -> ApiResult<Vec<ReturnRecord>> {
        Ok(self.record_repo.list_all()?)
    }

    /// 文本检索（imei/sku/product/dealer/invoice, 大小写不敏感; 空文本返回全部）
    pub fn filter_by_text(&self, text: &str) -> ApiResult<Vec<ReturnRecord>> {
        let records = self.record_repo.filter_by_text(text)?;
        debug!(text = %text, matched = records.len(), "文本检索");
        Ok(records)
    }

    /// 谓词查询（插入顺序, 不修改仓储）
    pub fn query<P>(&self, predicate: P) -> ApiResult<Vec<ReturnRecord>>
    where
        P: FnMut(&ReturnRecord) -> bool,
    {
        Ok(self.record_repo.query(predicate)?.collect())
    }

    /// 待检队列: Inbound 记录 + 文本过滤
    pub fn list_inbound(&self, text: &str) -> ApiResult<Vec<ReturnRecord>> {
        let needle = text.to_lowercase();
        self.query(|r| r.status() == ReturnStatus::Inbound && r.matches_text(&needle))
    }

    /// 送修队列: WaitingService + AtMitracare
    pub fn list_service_queue(&self) -> ApiResult<Vec<ReturnRecord>> {
        Ok(self
            .record_repo
            .find_by_statuses(&[ReturnStatus::WaitingService, ReturnStatus::AtMitracare])?)
    }

    /// 清仓队列: InClearance
    pub fn list_clearance_queue(&self) -> ApiResult<Vec<ReturnRecord>> {
        Ok(self
            .record_repo
            .find_by_statuses(&[ReturnStatus::InClearance])?)
    }

    // ==========================================
    // 批量入库
    // ==========================================

    /// 批量入库
    ///
    /// 逐条调用 add; 单条失败（如 DuplicateId）记入报告, 不中断整批。
    ///
    /// # 参数
    /// - records: 候选记录（行号从 1 开始按顺序编号）
    /// - source: 来源描述（文件名等）
    pub fn import_records<I>(&self, records: I, source: Option<String>) -> ApiResult<ImportReport>
    where
        I: IntoIterator<Item = NewReturnRecord>,
    {
        let mut report = ImportReport::new(source);

        for (idx, input) in records.into_iter().enumerate() {
            let row = idx + 1;
            let supplied_id = input.id.clone();
            match self.add_as(input, ActionType::Import) {
                Ok(record) => report.record_success(record.id),
                Err(e) => report.record_failure(row, supplied_id, e.to_string()),
            }
        }

        info!(
            batch_id = %report.batch_id,
            total = report.total_rows,
            imported = report.success_count(),
            failed = report.failure_count(),
            "批量入库完成"
        );

        Ok(report)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 记录ActionLog, 失败时只记录警告（不影响已完成的写操作）
    fn write_action_log(
        &self,
        record_id: &str,
        action_type: ActionType,
        payload: Option<serde_json::Value>,
        detail: Option<String>,
    ) {
        let log = ActionLog::new(record_id, action_type, self.actor.as_str(), payload, detail);
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(record_id = %record_id, error = %e, "记录操作日志失败");
        }
    }

    /// 发布事件, 失败时只记录警告
    fn publish(&self, record: &ReturnRecord, event_type: ReturnEventType) {
        let event = ReturnEvent::new(
            record.id.clone(),
            event_type,
            record.status(),
            record.storage(),
            Some(self.actor.clone()),
        );
        if let Err(e) = self.event_publisher.publish(event) {
            warn!(record_id = %record.id, error = %e, "事件发布失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Grade, StorageBucket};

    fn api() -> DoaApi {
        DoaApi::new(
            Arc::new(ReturnRecordRepository::new()),
            Arc::new(ActionLogRepository::new()),
            Arc::new(OptionalEventPublisher::none()),
            "inspector",
        )
    }

    fn add(api: &DoaApi, id: &str) -> ReturnRecord {
        api.add(NewReturnRecord {
            id: Some(id.to_string()),
            product: Some("iPhone 15".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_assign_grade_invalid_grade() {
        let api = api();
        add(&api, "R1");
        let err = api.assign_grade("R1", "E").unwrap_err();
        assert!(matches!(err, ApiError::InvalidGrade(ref g) if g == "E"));
        assert_eq!(api.get_record("R1").unwrap().status(), ReturnStatus::Inbound);
    }

    #[test]
    fn test_assign_grade_unknown_id() {
        let err = api().assign_grade("missing", "A").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_allocate_invalid_target() {
        let api = api();
        add(&api, "R1");
        api.assign_grade("R1", "D").unwrap();
        let err = api.allocate("R1", "Clearance").unwrap_err();
        assert!(matches!(err, ApiError::InvalidTarget(_)));
        assert_eq!(api.get_record("R1").unwrap().status(), ReturnStatus::InClearance);
    }

    #[test]
    fn test_regrade_at_mitracare_reapplies_rule() {
        let api = api();
        add(&api, "R1");
        api.assign_grade("R1", "A").unwrap();
        api.send_to_service("R1").unwrap();

        let record = api.assign_grade("R1", "C").unwrap();
        assert_eq!(record.status(), ReturnStatus::InClearance);
        assert_eq!(record.storage(), StorageBucket::DamageDoa);
        assert_eq!(record.grade(), Some(Grade::C));

        let record = api.assign_grade("R1", "B").unwrap();
        assert_eq!(record.status(), ReturnStatus::WaitingService);
        assert!(api.list_service_queue().unwrap().iter().any(|r| r.id == "R1"));
    }

    #[test]
    fn test_update_unknown_id_reports_not_found() {
        let api = api();
        let err = api.update("missing", ReturnRecordPatch::default()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        add(&api, "R1");
        let err = api.update("R1", ReturnRecordPatch::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_attach_document_and_update_notes() {
        let api = api();
        add(&api, "R1");

        let record = api
            .attach_document("R1", "approval_email", "approval-2024-11.pdf")
            .unwrap();
        assert!(record.has_document(DocumentKind::ApprovalEmail));

        let record = api
            .update(
                "R1",
                ReturnRecordPatch {
                    damage_type: Some("Mati total".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(record.damage_type.as_deref(), Some("Mati total"));
        assert_eq!(record.documents().len(), 1);

        let err = api.attach_document("R1", "spreadsheet", "x.xls").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_update_finished_rejected() {
        let api = api();
        add(&api, "R1");
        api.assign_grade("R1", "C").unwrap();
        api.allocate("R1", "WSK").unwrap();

        let err = api
            .update(
                "R1",
                ReturnRecordPatch {
                    description: Some("late note".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::TerminalState(_)));
        assert_eq!(api.get_record("R1").unwrap().storage(), StorageBucket::Wsk);
    }

    #[test]
    fn test_for_actor_shares_store() {
        let api = api();
        let supervisor = api.for_actor("supervisor");
        add(&supervisor, "R1");
        assert_eq!(supervisor.actor(), "supervisor");
        assert!(api.get_record("R1").is_ok());
    }

    #[test]
    fn test_queue_views() {
        let api = api();
        for id in ["R1", "R2", "R3", "R4"] {
            add(&api, id);
        }
        api.assign_grade("R1", "A").unwrap();
        api.assign_grade("R2", "B").unwrap();
        api.send_to_service("R2").unwrap();
        api.assign_grade("R3", "C").unwrap();

        let ids = |records: Vec<ReturnRecord>| records.into_iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(api.list_inbound("").unwrap()), vec!["R4"]);
        assert_eq!(ids(api.list_inbound("galaxy").unwrap()), Vec::<String>::new());
        assert_eq!(ids(api.list_service_queue().unwrap()), vec!["R1", "R2"]);
        assert_eq!(ids(api.list_clearance_queue().unwrap()), vec!["R3"]);
    }
}
