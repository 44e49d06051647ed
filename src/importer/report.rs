// ==========================================
// D.O.A 退货处置系统 - 导入结果报告
// ==========================================
// 单行失败不影响整批, 逐行记录原因
// ==========================================

use serde::{Deserialize, Serialize};

/// 单行失败原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row: usize,                // 数据行号（从 1 开始）
    pub record_id: Option<String>, // 源数据中的ID（如有）
    pub reason: String,
}

/// 批量导入报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub source: Option<String>, // 来源文件
    pub total_rows: usize,
    pub imported: Vec<String>, // 成功入库的记录ID（按行顺序）
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    pub fn new(source: Option<String>) -> Self {
        Self {
            batch_id: uuid::Uuid::new_v4().to_string(),
            source,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, id: String) {
        self.total_rows += 1;
        self.imported.push(id);
    }

    pub fn record_failure(&mut self, row: usize, record_id: Option<String>, reason: impl Into<String>) {
        self.total_rows += 1;
        self.failures.push(RowFailure {
            row,
            record_id,
            reason: reason.into(),
        });
    }

    pub fn success_count(&self) -> usize {
        self.imported.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
