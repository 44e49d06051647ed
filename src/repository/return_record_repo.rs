// ==========================================
// D.O.A 退货处置系统 - 退货记录仓储
// ==========================================
// 职责: 退货记录的权威集合（内存存储）
// 存储: 槽位数组 + id 索引, 保持插入顺序
// 并发: RwLock 串行化写入, 读取基于一致快照
// 红线: Repository 不含业务规则, 阶段变更由调用方计算
// ==========================================

use crate::domain::return_record::{NewReturnRecord, ReturnRecord, ReturnRecordPatch, StageChange};
use crate::domain::types::ReturnStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 默认生成ID前缀
pub const DEFAULT_ID_PREFIX: &str = "DOA-";

/// 默认生成ID序号位数
pub const DEFAULT_ID_WIDTH: usize = 4;

// ==========================================
// RecordArena - 槽位存储
// ==========================================
#[derive(Default)]
struct RecordArena {
    slots: Vec<ReturnRecord>,
    index: HashMap<String, usize>,
    next_seq: u64,
}

impl RecordArena {
    fn slot_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

// ==========================================
// StageTransition - 阶段变更结果
// ==========================================
#[derive(Debug, Clone)]
pub struct StageTransition {
    pub before: StageChange,  // 变更前阶段
    pub record: ReturnRecord, // 变更后记录
}

// ==========================================
// ReturnRecordRepository - 退货记录仓储
// ==========================================
pub struct ReturnRecordRepository {
    arena: RwLock<RecordArena>,
    id_prefix: String,
    id_width: usize,
}

impl Default for ReturnRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReturnRecordRepository {
    /// 创建空仓储（默认ID格式 DOA-0001）
    pub fn new() -> Self {
        Self::with_id_format(DEFAULT_ID_PREFIX, DEFAULT_ID_WIDTH)
    }

    /// 指定生成ID格式
    pub fn with_id_format(prefix: &str, width: usize) -> Self {
        Self {
            arena: RwLock::new(RecordArena::default()),
            id_prefix: prefix.to_string(),
            id_width: width,
        }
    }

    fn read_arena(&self) -> RepositoryResult<RwLockReadGuard<'_, RecordArena>> {
        self.arena
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn write_arena(&self) -> RepositoryResult<RwLockWriteGuard<'_, RecordArena>> {
        self.arena
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 新增退货记录
    ///
    /// # 参数
    /// - input: 入库参数；id 为空（或仅空白）时由仓储生成
    ///
    /// # 返回
    /// - Ok(ReturnRecord): 新记录（Inbound / 无库位 / 未定级）
    /// - Err(DuplicateId): id 已存在
    pub fn add(&self, mut input: NewReturnRecord) -> RepositoryResult<ReturnRecord> {
        let mut arena = self.write_arena()?;

        let supplied = input
            .id
            .take()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let id = match supplied {
            Some(id) => {
                if arena.index.contains_key(&id) {
                    return Err(RepositoryError::DuplicateId(id));
                }
                id
            }
            None => self.next_generated_id(&mut arena),
        };

        let record = ReturnRecord::intake(id.clone(), input);
        let slot = arena.slots.len();
        arena.slots.push(record.clone());
        arena.index.insert(id, slot);

        Ok(record)
    }

    /// 生成下一个未占用的ID
    fn next_generated_id(&self, arena: &mut RecordArena) -> String {
        loop {
            arena.next_seq += 1;
            let candidate = format!(
                "{}{:0width$}",
                self.id_prefix,
                arena.next_seq,
                width = self.id_width
            );
            if !arena.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// 合并检验备注补丁
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    /// - Err(TerminalState): 记录已 Finished
    pub fn update(&self, id: &str, patch: ReturnRecordPatch) -> RepositoryResult<ReturnRecord> {
        let mut arena = self.write_arena()?;
        let slot = arena
            .slot_of(id)
            .ok_or_else(|| RepositoryError::record_not_found(id))?;

        let record = &mut arena.slots[slot];
        if record.is_finished() {
            return Err(RepositoryError::TerminalState { id: id.to_string() });
        }

        record.apply_patch(patch);
        Ok(record.clone())
    }

    /// 原子阶段变更
    ///
    /// 在同一把写锁内完成 读取 → 判定 → 写入, 同一记录的并发变更不会交错。
    /// `decide` 返回错误时记录保持不变。
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    /// - Err(TerminalState): 记录已 Finished
    /// - Err(InconsistentStage): 计算出的状态与库位不匹配
    /// - Err(E): `decide` 拒绝该变更
    pub fn transition<E, F>(&self, id: &str, decide: F) -> Result<StageTransition, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&ReturnRecord) -> Result<StageChange, E>,
    {
        let mut arena = self.write_arena()?;
        let slot = arena
            .slot_of(id)
            .ok_or_else(|| RepositoryError::record_not_found(id))?;

        let record = &mut arena.slots[slot];
        if record.is_finished() {
            return Err(RepositoryError::TerminalState { id: id.to_string() }.into());
        }

        let change = decide(record)?;
        if !change.is_consistent() {
            return Err(RepositoryError::InconsistentStage {
                status: change.status.to_string(),
                storage: change.storage.to_string(),
            }
            .into());
        }

        let before = record.stage();
        record.apply_stage(change);

        Ok(StageTransition {
            before,
            record: record.clone(),
        })
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按ID查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ReturnRecord>> {
        let arena = self.read_arena()?;
        Ok(arena.slot_of(id).map(|slot| arena.slots[slot].clone()))
    }

    /// 按ID查询（不存在即 NotFound）
    pub fn get(&self, id: &str) -> RepositoryResult<ReturnRecord> {
        self.find_by_id(id)?
            .ok_or_else(|| RepositoryError::record_not_found(id))
    }

    /// 当前全部记录快照（插入顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ReturnRecord>> {
        Ok(self.read_arena()?.slots.clone())
    }

    /// 谓词查询
    ///
    /// 返回基于调用时快照的惰性迭代器, 插入顺序, 不修改仓储
    pub fn query<P>(&self, predicate: P) -> RepositoryResult<impl Iterator<Item = ReturnRecord>>
    where
        P: FnMut(&ReturnRecord) -> bool,
    {
        let snapshot = self.list_all()?;
        Ok(snapshot.into_iter().filter(predicate))
    }

    /// 文本检索（imei/sku/product/dealer/invoice, 大小写不敏感, 子串匹配）
    ///
    /// 空文本返回全部记录
    pub fn filter_by_text(&self, text: &str) -> RepositoryResult<Vec<ReturnRecord>> {
        let needle = text.to_lowercase();
        let matched = self.query(|r| r.matches_text(&needle))?.collect();
        Ok(matched)
    }

    /// 按状态集合查询
    pub fn find_by_statuses(&self, statuses: &[ReturnStatus]) -> RepositoryResult<Vec<ReturnRecord>> {
        Ok(self.query(|r| statuses.contains(&r.status()))?.collect())
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(self.read_arena()?.slots.len())
    }

    pub fn contains(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.read_arena()?.index.contains_key(id))
    }
}
