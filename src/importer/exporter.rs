// ==========================================
// D.O.A 退货处置系统 - CSV 导出
// ==========================================
// 职责: 记录快照 → CSV；空白导入模板
// 说明: 导出文件可直接回导（流程列在导入时被忽略）
// ==========================================

use crate::domain::return_record::ReturnRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::TEMPLATE_HEADERS;
use csv::Writer;
use std::io::Write;
use std::path::Path;

const COL_GRADE: &str = "Grade";
const COL_STATUS: &str = "Status";
const COL_STORAGE: &str = "Storage";
const COL_DOCUMENTS: &str = "Documents";

pub struct RecordExporter;

impl RecordExporter {
    /// 写出记录（标准列 + 流程列）
    pub fn write_records<W: Write>(&self, sink: W, records: &[ReturnRecord]) -> ImportResult<usize> {
        let mut writer = Writer::from_writer(sink);

        let mut headers: Vec<&str> = TEMPLATE_HEADERS.to_vec();
        headers.extend([COL_GRADE, COL_STATUS, COL_STORAGE, COL_DOCUMENTS]);
        writer.write_record(&headers)?;

        for record in records {
            let price = format_price(record.price_ex_ppn);
            let grade = record.grade().map(|g| g.as_str()).unwrap_or("");
            let documents = record
                .documents()
                .iter()
                .map(|d| format!("{}:{}", d.kind.as_str(), d.reference))
                .collect::<Vec<_>>()
                .join(";");

            writer.write_record([
                record.id.as_str(),
                record.imei.as_deref().unwrap_or(""),
                record.sku.as_deref().unwrap_or(""),
                record.product.as_deref().unwrap_or(""),
                record.dealer.as_deref().unwrap_or(""),
                record.invoice.as_deref().unwrap_or(""),
                record.damage_type.as_deref().unwrap_or(""),
                record.description.as_deref().unwrap_or(""),
                price.as_str(),
                grade,
                record.status().as_str(),
                record.storage().as_str(),
                documents.as_str(),
            ])?;
        }

        writer
            .flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(records.len())
    }

    /// 导出到文件
    pub fn export_to_path(&self, path: &Path, records: &[ReturnRecord]) -> ImportResult<usize> {
        let file = std::fs::File::create(path)
            .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))?;
        let written = self.write_records(file, records)?;
        tracing::info!(path = %path.display(), rows = written, "导出退货记录完成");
        Ok(written)
    }

    /// 写出空白导入模板（仅表头）
    pub fn write_template<W: Write>(&self, sink: W) -> ImportResult<()> {
        let mut writer = Writer::from_writer(sink);
        writer.write_record(TEMPLATE_HEADERS)?;
        writer
            .flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(())
    }
}

/// 价格导出文本
///
/// 小数部分恰好三位时补一个 0, 回导时不会被当作千分位
fn format_price(value: f64) -> String {
    let text = value.to_string();
    match text.split_once('.') {
        Some((_, fraction)) if fraction.len() == 3 => format!("{}0", text),
        _ => text,
    }
}
