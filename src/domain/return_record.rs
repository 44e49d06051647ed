// ==========================================
// D.O.A 退货处置系统 - 退货记录领域模型
// ==========================================
// 职责: 定义退货记录实体、入库参数、补丁、阶段变更
// 红线: status/storage/grade 只能通过 StageChange 整体变更
// ==========================================

use crate::domain::types::{DocumentKind, Grade, ReturnStatus, StorageBucket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ReturnDocument - 佐证文档
// ==========================================
// 只保存不透明引用，不做格式校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDocument {
    pub document_id: String,        // 文档ID
    pub kind: DocumentKind,         // 文档类型
    pub reference: String,          // 外部引用（文件名/URL）
    pub attached_at: DateTime<Utc>, // 附加时间
}

impl ReturnDocument {
    pub fn new(kind: DocumentKind, reference: impl Into<String>) -> Self {
        Self {
            document_id: uuid::Uuid::new_v4().to_string(),
            kind,
            reference: reference.into(),
            attached_at: Utc::now(),
        }
    }
}

// ==========================================
// NewReturnRecord - 入库参数
// ==========================================
// 用途: 人工录入 / 批量导入 → ReturnRecordRepository::add
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReturnRecord {
    pub id: Option<String>, // 为空时由仓储生成

    // ===== 描述字段（入库后不可变）=====
    pub imei: Option<String>,
    pub sku: Option<String>,
    pub product: Option<String>,
    pub dealer: Option<String>,
    pub invoice: Option<String>,

    // ===== 检验备注 =====
    pub damage_type: Option<String>,
    pub description: Option<String>,

    // ===== 估值 =====
    pub price_ex_ppn: f64, // 不含税价格（仅用于报表）

    pub documents: Vec<ReturnDocument>,
}

// ==========================================
// ReturnRecordPatch - 检验备注补丁
// ==========================================
// 只允许修改备注与追加文档；描述字段与流程字段不在补丁内
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnRecordPatch {
    pub damage_type: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<ReturnDocument>,
}

impl ReturnRecordPatch {
    pub fn is_empty(&self) -> bool {
        self.damage_type.is_none() && self.description.is_none() && self.documents.is_empty()
    }
}

// ==========================================
// StageChange - 流程阶段变更
// ==========================================
// 由引擎层计算，仓储层原子写入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChange {
    pub grade: Option<Grade>,
    pub status: ReturnStatus,
    pub storage: StorageBucket,
}

impl StageChange {
    /// 变更是否满足状态-库位一致性
    pub fn is_consistent(&self) -> bool {
        self.status.allows_storage(self.storage)
    }
}

// ==========================================
// ReturnRecord - 退货记录
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ReturnRecord {
    // ===== 主键 =====
    pub id: String,

    // ===== 描述字段 =====
    pub imei: Option<String>,
    pub sku: Option<String>,
    pub product: Option<String>,
    pub dealer: Option<String>,
    pub invoice: Option<String>,

    // ===== 检验备注 =====
    pub damage_type: Option<String>,
    pub description: Option<String>,

    // ===== 流程字段（只读，经 StageChange 变更）=====
    grade: Option<Grade>,
    status: ReturnStatus,
    storage: StorageBucket,

    documents: Vec<ReturnDocument>,

    pub price_ex_ppn: f64,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReturnRecord {
    /// 入库创建：Inbound / 无库位 / 未定级
    pub(crate) fn intake(id: String, input: NewReturnRecord) -> Self {
        let now = Utc::now();
        Self {
            id,
            imei: input.imei,
            sku: input.sku,
            product: input.product,
            dealer: input.dealer,
            invoice: input.invoice,
            damage_type: input.damage_type,
            description: input.description,
            grade: None,
            status: ReturnStatus::Inbound,
            storage: StorageBucket::Unassigned,
            documents: input.documents,
            price_ex_ppn: input.price_ex_ppn,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn status(&self) -> ReturnStatus {
        self.status
    }

    pub fn storage(&self) -> StorageBucket {
        self.storage
    }

    pub fn documents(&self) -> &[ReturnDocument] {
        &self.documents
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// 当前阶段快照
    pub fn stage(&self) -> StageChange {
        StageChange {
            grade: self.grade,
            status: self.status,
            storage: self.storage,
        }
    }

    pub fn has_document(&self, kind: DocumentKind) -> bool {
        self.documents.iter().any(|d| d.kind == kind)
    }

    /// 原子写入阶段变更（调用方已校验一致性）
    pub(crate) fn apply_stage(&mut self, change: StageChange) {
        self.grade = change.grade;
        self.status = change.status;
        self.storage = change.storage;
        self.updated_at = Utc::now();
    }

    /// 合并补丁（文档只追加）
    pub(crate) fn apply_patch(&mut self, patch: ReturnRecordPatch) {
        if let Some(damage_type) = patch.damage_type {
            self.damage_type = Some(damage_type);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        self.documents.extend(patch.documents);
        self.updated_at = Utc::now();
    }

    /// 文本检索：imei/sku/product/dealer/invoice 任一包含即命中
    ///
    /// `needle` 须已转小写；缺失字段按空串处理
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [
            &self.imei,
            &self.sku,
            &self.product,
            &self.dealer,
            &self.invoice,
        ]
        .iter()
        .any(|field| {
            field
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(needle)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReturnRecord {
        ReturnRecord::intake(
            "DOA-0001".to_string(),
            NewReturnRecord {
                imei: Some("356789012345678".to_string()),
                sku: Some("IP15-128-BLK".to_string()),
                product: Some("iPhone 15 128GB Black".to_string()),
                dealer: None,
                invoice: Some("INV/GDN3/2512/0042".to_string()),
                price_ex_ppn: 12_500_000.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_intake_initial_stage() {
        let record = sample();
        assert_eq!(record.status(), ReturnStatus::Inbound);
        assert_eq!(record.storage(), StorageBucket::Unassigned);
        assert!(record.grade().is_none());
        assert!(record.stage().is_consistent());
    }

    #[test]
    fn test_matches_text_missing_field() {
        let record = sample();
        // dealer 缺失不影响其他字段命中
        assert!(record.matches_text("iphone"));
        assert!(record.matches_text("gdn3"));
        assert!(!record.matches_text("samsung"));
        assert!(record.matches_text(""));
    }

    #[test]
    fn test_apply_patch_appends_documents() {
        let mut record = sample();
        record.apply_patch(ReturnRecordPatch {
            damage_type: Some("LCD retak".to_string()),
            description: None,
            documents: vec![ReturnDocument::new(DocumentKind::Photo, "front.jpg")],
        });
        record.apply_patch(ReturnRecordPatch {
            documents: vec![ReturnDocument::new(DocumentKind::VideoEvidence, "unboxing.mp4")],
            ..Default::default()
        });

        assert_eq!(record.damage_type.as_deref(), Some("LCD retak"));
        assert_eq!(record.documents().len(), 2);
        assert!(record.has_document(DocumentKind::Photo));
        assert!(!record.has_document(DocumentKind::ApprovalEmail));
    }
}
