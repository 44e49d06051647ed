// ==========================================
// D.O.A 退货处置系统 - 领域类型定义
// ==========================================
// 职责: 定级、流程状态、库位、分配目标、佐证文档类型
// 红线: 状态与库位必须成对出现（见 ReturnStatus::allows_storage）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 损坏等级 (Damage Grade)
// ==========================================
// 红线: A/B 必须送修, C/D 必须直接清仓（穷尽且互斥）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A, // 严重损坏
    B, // 功能故障
    C, // 轻微损坏
    D, // 外观瑕疵
}

impl Grade {
    /// 全部等级（按 A→D 顺序，用于报表补零）
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    /// 从字符串解析等级（忽略大小写与首尾空白）
    ///
    /// 返回 None 表示不在 {A,B,C,D} 之内，由调用方转换为 InvalidGrade
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            _ => None,
        }
    }

    /// 定级后的流转路径
    pub fn route(&self) -> GradeRoute {
        match self {
            Grade::A | Grade::B => GradeRoute::Service,
            Grade::C | Grade::D => GradeRoute::Clearance,
        }
    }

    /// 损坏程度说明
    pub fn severity(&self) -> &'static str {
        match self {
            Grade::A => "Heavy damage",
            Grade::B => "Functional defect",
            Grade::C => "Minor damage",
            Grade::D => "Cosmetic",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 定级路径 (Grade Route)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeRoute {
    Service,   // 送 Mitracare 维修
    Clearance, // 直接进入清仓
}

impl fmt::Display for GradeRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeRoute::Service => write!(f, "SERVICE"),
            GradeRoute::Clearance => write!(f, "CLEARANCE"),
        }
    }
}

// ==========================================
// 流程状态 (Return Status)
// ==========================================
// 流转: Inbound → (WaitingService → AtMitracare →) InClearance → Finished
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    Inbound,        // 入库待定级
    WaitingService, // 待送修
    AtMitracare,    // 维修中（外部服务商）
    InClearance,    // 清仓待分配
    Finished,       // 已完成（终态）
}

impl ReturnStatus {
    /// 全部状态（用于报表补零）
    pub const ALL: [ReturnStatus; 5] = [
        ReturnStatus::Inbound,
        ReturnStatus::WaitingService,
        ReturnStatus::AtMitracare,
        ReturnStatus::InClearance,
        ReturnStatus::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Inbound => "INBOUND",
            ReturnStatus::WaitingService => "WAITING_SERVICE",
            ReturnStatus::AtMitracare => "AT_MITRACARE",
            ReturnStatus::InClearance => "IN_CLEARANCE",
            ReturnStatus::Finished => "FINISHED",
        }
    }

    /// 界面展示名
    pub fn label(&self) -> &'static str {
        match self {
            ReturnStatus::Inbound => "Inbound",
            ReturnStatus::WaitingService => "Waiting Service",
            ReturnStatus::AtMitracare => "At Mitracare",
            ReturnStatus::InClearance => "In Clearance",
            ReturnStatus::Finished => "Finished",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReturnStatus::Finished)
    }

    /// 状态-库位一致性表
    pub fn allows_storage(&self, storage: StorageBucket) -> bool {
        match self {
            ReturnStatus::Inbound => storage == StorageBucket::Unassigned,
            ReturnStatus::WaitingService | ReturnStatus::AtMitracare => {
                storage == StorageBucket::DamageDoa
            }
            ReturnStatus::InClearance => {
                matches!(storage, StorageBucket::DamageDoa | StorageBucket::Clearance)
            }
            ReturnStatus::Finished => matches!(storage, StorageBucket::Wsk | StorageBucket::Dg),
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 库位 (Storage Bucket)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageBucket {
    #[serde(rename = "NONE")]
    Unassigned, // 未入库位
    #[serde(rename = "Damage D.O.A")]
    DamageDoa, // 坏品暂存
    #[serde(rename = "Clearance")]
    Clearance, // 清仓区
    #[serde(rename = "WSK")]
    Wsk, // 可售库存
    #[serde(rename = "DG")]
    Dg, // 确认次品
}

impl StorageBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBucket::Unassigned => "NONE",
            StorageBucket::DamageDoa => "Damage D.O.A",
            StorageBucket::Clearance => "Clearance",
            StorageBucket::Wsk => "WSK",
            StorageBucket::Dg => "DG",
        }
    }

    /// 从库位标签解析（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "" | "NONE" | "-" => Some(StorageBucket::Unassigned),
            "DAMAGE D.O.A" | "DAMAGE_DOA" | "DAMAGEDOA" => Some(StorageBucket::DamageDoa),
            "CLEARANCE" => Some(StorageBucket::Clearance),
            "WSK" => Some(StorageBucket::Wsk),
            "DG" => Some(StorageBucket::Dg),
            _ => None,
        }
    }

    /// 是否终态库位（WSK/DG）
    pub fn is_final(&self) -> bool {
        matches!(self, StorageBucket::Wsk | StorageBucket::Dg)
    }

    /// 该库位是否需要审批
    ///
    /// 审批人和审批完成信号均未建模，这里只保留库位分类。
    pub fn requires_approval(&self, approval_required: &[StorageBucket]) -> bool {
        approval_required.contains(self)
    }
}

impl fmt::Display for StorageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 清仓分配目标 (Allocation Target)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationTarget {
    Wsk, // 可售
    Dg,  // 次品
}

impl AllocationTarget {
    /// 解析分配目标，仅接受 WSK / DG
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WSK" => Some(AllocationTarget::Wsk),
            "DG" => Some(AllocationTarget::Dg),
            _ => None,
        }
    }

    pub fn storage(&self) -> StorageBucket {
        match self {
            AllocationTarget::Wsk => StorageBucket::Wsk,
            AllocationTarget::Dg => StorageBucket::Dg,
        }
    }
}

impl fmt::Display for AllocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage().as_str())
    }
}

// ==========================================
// 佐证文档类型 (Document Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    ApprovalEmail, // 审批邮件 (PDF)
    VideoEvidence, // 开箱视频
    Photo,         // 实物照片
}

impl DocumentKind {
    /// 解析文档类型，兼容文件扩展名
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "approval_email" | "approvalemail" | "email" | "pdf" => Some(DocumentKind::ApprovalEmail),
            "video_evidence" | "videoevidence" | "video" | "mp4" => Some(DocumentKind::VideoEvidence),
            "photo" | "jpg" | "jpeg" | "png" => Some(DocumentKind::Photo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::ApprovalEmail => "APPROVAL_EMAIL",
            DocumentKind::VideoEvidence => "VIDEO_EVIDENCE",
            DocumentKind::Photo => "PHOTO",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_route_partition() {
        assert_eq!(Grade::A.route(), GradeRoute::Service);
        assert_eq!(Grade::B.route(), GradeRoute::Service);
        assert_eq!(Grade::C.route(), GradeRoute::Clearance);
        assert_eq!(Grade::D.route(), GradeRoute::Clearance);
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!(Grade::parse("a"), Some(Grade::A));
        assert_eq!(Grade::parse(" D "), Some(Grade::D));
        assert_eq!(Grade::parse("E"), None);
        assert_eq!(Grade::parse(""), None);
    }

    #[test]
    fn test_status_storage_table() {
        assert!(ReturnStatus::Inbound.allows_storage(StorageBucket::Unassigned));
        assert!(!ReturnStatus::Inbound.allows_storage(StorageBucket::DamageDoa));
        assert!(ReturnStatus::InClearance.allows_storage(StorageBucket::Clearance));
        assert!(ReturnStatus::InClearance.allows_storage(StorageBucket::DamageDoa));
        assert!(ReturnStatus::Finished.allows_storage(StorageBucket::Wsk));
        assert!(!ReturnStatus::Finished.allows_storage(StorageBucket::Clearance));
    }

    #[test]
    fn test_allocation_target_parse() {
        assert_eq!(AllocationTarget::parse("wsk"), Some(AllocationTarget::Wsk));
        assert_eq!(AllocationTarget::parse("DG"), Some(AllocationTarget::Dg));
        assert_eq!(AllocationTarget::parse("Clearance"), None);
        assert_eq!(AllocationTarget::Dg.storage(), StorageBucket::Dg);
    }

    #[test]
    fn test_storage_serde_label() {
        let json = serde_json::to_string(&StorageBucket::DamageDoa).unwrap();
        assert_eq!(json, "\"Damage D.O.A\"");
        let back: StorageBucket = serde_json::from_str("\"WSK\"").unwrap();
        assert_eq!(back, StorageBucket::Wsk);
    }
}
