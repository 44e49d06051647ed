// ==========================================
// D.O.A 退货处置系统 - 导入导出 API
// ==========================================
// 职责: 文件批量入库、CSV 导出、导入模板
// 流程: 文件解析 → 字段映射 → DoaApi::import_records（逐条入库）
// ==========================================

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::doa_api::DoaApi;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::return_record::{NewReturnRecord, ReturnRecord};
use crate::importer::{
    FieldMapper, ImportError, ImportReport, RecordExporter, RowFailure, UniversalFileParser,
};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 入库报告（成功ID + 逐行失败原因）
    pub report: ImportReport,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u128,
}

// ==========================================
// ImportApi - 导入导出 API
// ==========================================
pub struct ImportApi {
    doa_api: DoaApi,
    max_rows: usize,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// # 参数
    /// - doa_api: 退货处置API（入库操作的唯一入口）
    /// - max_rows: 单个文件行数上限
    pub fn new(doa_api: DoaApi, max_rows: usize) -> Self {
        Self { doa_api, max_rows }
    }

    /// 从文件批量入库（CSV / Excel）
    ///
    /// 字段映射失败的行与入库失败的行都记入报告, 不中断整批。
    /// 文件级错误（不存在、格式不支持、超出行数上限）直接返回错误。
    pub fn import_file(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let started = Instant::now();
        let path = Path::new(file_path);

        let rows = UniversalFileParser.parse(path).map_err(|e| {
            warn!(file = %file_path, error = %e, "导入文件解析失败");
            ApiError::from(e)
        })?;

        if rows.len() > self.max_rows {
            return Err(ImportError::RowLimitExceeded {
                rows: rows.len(),
                max: self.max_rows,
            }
            .into());
        }

        // 映射阶段: 失败行先记下, 成功行保留原行号
        let mapper = FieldMapper;
        let mut mapped: Vec<(usize, NewReturnRecord)> = Vec::with_capacity(rows.len());
        let mut mapping_failures: Vec<RowFailure> = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            match mapper.map_row(row, row_number) {
                Ok(record) => mapped.push((row_number, record)),
                Err(e) => mapping_failures.push(RowFailure {
                    row: row_number,
                    record_id: None,
                    reason: e.to_string(),
                }),
            }
        }

        let row_numbers: Vec<usize> = mapped.iter().map(|(row, _)| *row).collect();
        let mut report = self.doa_api.import_records(
            mapped.into_iter().map(|(_, record)| record),
            Some(file_path.to_string()),
        )?;

        // import_records 按候选顺序编号, 这里换回文件行号
        for failure in report.failures.iter_mut() {
            if let Some(row) = row_numbers.get(failure.row - 1) {
                failure.row = *row;
            }
        }
        report.total_rows += mapping_failures.len();
        report.failures.extend(mapping_failures);
        report.failures.sort_by_key(|f| f.row);

        let elapsed_ms = started.elapsed().as_millis();
        info!(
            file = %file_path,
            total = report.total_rows,
            imported = report.success_count(),
            failed = report.failure_count(),
            elapsed_ms = elapsed_ms as u64,
            "文件导入完成"
        );

        Ok(ImportApiResponse { report, elapsed_ms })
    }

    /// 导出记录为 CSV 文件
    ///
    /// # 参数
    /// - text: 文本过滤（空串导出全部）
    ///
    /// # 返回
    /// - 写出的记录数
    pub fn export_csv(&self, file_path: &str, text: &str) -> ApiResult<usize> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }
        let records: Vec<ReturnRecord> = self.doa_api.filter_by_text(text)?;
        Ok(RecordExporter.export_to_path(Path::new(file_path), &records)?)
    }

    /// 生成空白导入模板（CSV 文本）
    pub fn template_csv(&self) -> ApiResult<String> {
        let mut buffer = Vec::new();
        RecordExporter.write_template(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ApiError::InternalError(e.to_string()))
    }
}
