// ==========================================
// D.O.A 退货处置系统 - 导入层
// ==========================================
// 职责: 外部文件 → 入库参数；记录 → CSV 导出
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;
pub mod report;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use exporter::RecordExporter;
pub use field_mapper::{FieldMapper, TEMPLATE_HEADERS};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use report::{ImportReport, RowFailure};
