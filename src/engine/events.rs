// ==========================================
// D.O.A 退货处置系统 - 引擎层事件发布
// ==========================================
// 职责: 定义记录变更事件与发布 trait
// 说明: 展示层实现 ReturnEventPublisher 订阅仓储变更
// ==========================================

use crate::domain::types::{ReturnStatus, StorageBucket};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 事件类型
// ==========================================

/// 退货记录事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnEventType {
    /// 新增记录
    RecordAdded,
    /// 检验备注更新
    RecordUpdated,
    /// 追加佐证文档
    DocumentAttached,
    /// 定级
    GradeAssigned,
    /// 送修
    SentToService,
    /// 维修返回
    ReceivedFromService,
    /// 清仓分配
    Allocated,
}

impl ReturnEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            ReturnEventType::RecordAdded => "RecordAdded",
            ReturnEventType::RecordUpdated => "RecordUpdated",
            ReturnEventType::DocumentAttached => "DocumentAttached",
            ReturnEventType::GradeAssigned => "GradeAssigned",
            ReturnEventType::SentToService => "SentToService",
            ReturnEventType::ReceivedFromService => "ReceivedFromService",
            ReturnEventType::Allocated => "Allocated",
        }
    }
}

/// 退货记录事件
///
/// 写操作成功后发布, 携带变更后的阶段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnEvent {
    /// 记录ID
    pub record_id: String,
    /// 事件类型
    pub event_type: ReturnEventType,
    /// 变更后状态
    pub status: ReturnStatus,
    /// 变更后库位
    pub storage: StorageBucket,
    /// 操作人
    pub actor: Option<String>,
}

impl ReturnEvent {
    pub fn new(
        record_id: impl Into<String>,
        event_type: ReturnEventType,
        status: ReturnStatus,
        storage: StorageBucket,
        actor: Option<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            event_type,
            status,
            storage,
            actor,
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 退货事件发布者 Trait
///
/// # 实现说明
/// - 展示层实现此 trait 以刷新视图
/// - 发布失败只记录日志, 不回滚已完成的写操作
pub trait ReturnEventPublisher: Send + Sync {
    /// 发布事件
    ///
    /// # 返回
    /// - `Ok(receipt)`: 回执（如果支持）或空字符串
    /// - `Err`: 发布失败
    fn publish(&self, event: ReturnEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl ReturnEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: ReturnEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - record_id={}, event_type={}",
            event.record_id,
            event.event_type.as_str()
        );
        Ok(String::new())
    }
}

/// 闭包适配的事件发布者
pub struct CallbackEventPublisher<F>
where
    F: Fn(&ReturnEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackEventPublisher<F>
where
    F: Fn(&ReturnEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ReturnEventPublisher for CallbackEventPublisher<F>
where
    F: Fn(&ReturnEvent) + Send + Sync,
{
    fn publish(&self, event: ReturnEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        (self.callback)(&event);
        Ok(String::new())
    }
}

/// 可选的事件发布者包装
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ReturnEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn ReturnEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    pub fn publish(&self, event: ReturnEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    "OptionalEventPublisher: 未配置发布者，跳过事件 - record_id={}, event_type={}",
                    event.record_id,
                    event.event_type.as_str()
                );
                Ok(String::new())
            }
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
