// ==========================================
// D.O.A 退货处置系统 - 操作日志领域模型
// ==========================================
// 红线: 所有成功的写操作必须记录
// 用途: 审计追踪（谁在何时把哪台机器从哪个阶段挪到哪个阶段）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,          // 日志ID
    pub record_id: String,          // 关联退货记录
    pub action_type: ActionType,    // 操作类型
    pub action_ts: NaiveDateTime,   // 操作时间戳 (UTC)
    pub actor: String,              // 操作人

    // ===== 操作负载 =====
    pub payload_json: Option<JsonValue>, // 变更前后阶段等 (JSON)

    pub detail: Option<String>, // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Intake,             // 入库
    Import,             // 批量导入
    UpdateNotes,        // 修改检验备注
    AttachDocument,     // 追加佐证文档
    AssignGrade,        // 定级
    SendToService,      // 送修
    ReceiveFromService, // 维修返回
    Allocate,           // 清仓分配
}

impl ActionType {
    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Intake => "Intake",
            ActionType::Import => "Import",
            ActionType::UpdateNotes => "UpdateNotes",
            ActionType::AttachDocument => "AttachDocument",
            ActionType::AssignGrade => "AssignGrade",
            ActionType::SendToService => "SendToService",
            ActionType::ReceiveFromService => "ReceiveFromService",
            ActionType::Allocate => "Allocate",
        }
    }

    /// 是否为流程阶段变更
    pub fn is_stage_change(&self) -> bool {
        matches!(
            self,
            ActionType::AssignGrade
                | ActionType::SendToService
                | ActionType::ReceiveFromService
                | ActionType::Allocate
        )
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ActionLog {
    /// 创建新日志（action_id 自动生成）
    pub fn new(
        record_id: impl Into<String>,
        action_type: ActionType,
        actor: impl Into<String>,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            record_id: record_id.into(),
            action_type,
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.into(),
            payload_json,
            detail,
        }
    }
}
