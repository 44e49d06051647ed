// ==========================================
// D.O.A 退货处置系统 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 标准字段映射 + 类型转换
// 列名: 大小写不敏感, 支持英文与印尼文别名
// ==========================================

use crate::domain::return_record::NewReturnRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use std::collections::HashMap;

// ===== 标准列名（导出与模板使用）=====
pub const COL_ID: &str = "ID";
pub const COL_IMEI: &str = "IMEI";
pub const COL_SKU: &str = "SKU";
pub const COL_PRODUCT: &str = "Product";
pub const COL_DEALER: &str = "Dealer";
pub const COL_INVOICE: &str = "Invoice";
pub const COL_DAMAGE_TYPE: &str = "Damage Type";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_PRICE_EX_PPN: &str = "Price Ex PPN";

/// 导入模板列顺序
pub const TEMPLATE_HEADERS: [&str; 9] = [
    COL_ID,
    COL_IMEI,
    COL_SKU,
    COL_PRODUCT,
    COL_DEALER,
    COL_INVOICE,
    COL_DAMAGE_TYPE,
    COL_DESCRIPTION,
    COL_PRICE_EX_PPN,
];

/// 标准列名 → 可接受的别名（小写）
fn aliases_of(column: &str) -> &'static [&'static str] {
    match column {
        COL_ID => &["id", "doa id", "no doa", "return id"],
        COL_IMEI => &["imei", "serial", "serial number"],
        COL_SKU => &["sku", "kode sku", "kode barang"],
        COL_PRODUCT => &["product", "produk", "nama produk", "model"],
        COL_DEALER => &["dealer", "toko", "nama dealer"],
        COL_INVOICE => &["invoice", "no invoice", "no. invoice", "faktur", "no faktur"],
        COL_DAMAGE_TYPE => &["damage type", "jenis kerusakan", "kerusakan"],
        COL_DESCRIPTION => &["description", "deskripsi", "keterangan", "catatan"],
        COL_PRICE_EX_PPN => &["price ex ppn", "harga ex ppn", "harga", "price"],
        _ => &[],
    }
}

pub struct FieldMapper;

impl FieldMapper {
    /// 映射一行为入库参数
    ///
    /// # 参数
    /// - row: 原始行
    /// - row_number: 数据行号（从 1 开始, 不含表头）
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<NewReturnRecord> {
        let normalized: HashMap<String, &str> = row
            .iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.as_str()))
            .collect();

        let record = NewReturnRecord {
            id: self.get_string(&normalized, COL_ID),
            imei: self.get_string(&normalized, COL_IMEI),
            sku: self.get_string(&normalized, COL_SKU),
            product: self.get_string(&normalized, COL_PRODUCT),
            dealer: self.get_string(&normalized, COL_DEALER),
            invoice: self.get_string(&normalized, COL_INVOICE),
            damage_type: self.get_string(&normalized, COL_DAMAGE_TYPE),
            description: self.get_string(&normalized, COL_DESCRIPTION),
            price_ex_ppn: self
                .parse_price(&normalized, row_number)?
                .unwrap_or(0.0),
            documents: Vec::new(),
        };

        // 至少需要一个可识别字段
        if record.imei.is_none()
            && record.sku.is_none()
            && record.product.is_none()
            && record.invoice.is_none()
        {
            return Err(ImportError::FieldMappingError {
                row: row_number,
                message: "IMEI/SKU/Product/Invoice 均为空".to_string(),
            });
        }

        Ok(record)
    }

    /// 提取字符串字段（按别名顺序取第一个非空值）
    fn get_string(&self, row: &HashMap<String, &str>, column: &str) -> Option<String> {
        aliases_of(column)
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    /// 解析不含税价格
    ///
    /// 接受 "Rp 1.500.000" / "Rp 1.500.000,50" / "1,500,000" / "1500000.50" 等写法
    fn parse_price(&self, row: &HashMap<String, &str>, row_number: usize) -> ImportResult<Option<f64>> {
        let raw = match self.get_string(row, COL_PRICE_EX_PPN) {
            None => return Ok(None),
            Some(v) => v,
        };

        let conversion_error = || ImportError::TypeConversionError {
            row: row_number,
            field: COL_PRICE_EX_PPN.to_string(),
            message: format!("无法解析为金额: {}", raw),
        };

        let value = normalize_amount(&raw)
            .ok_or_else(conversion_error)?
            .parse::<f64>()
            .map_err(|_| conversion_error())?;

        if !value.is_finite() {
            return Err(conversion_error());
        }

        if value < 0.0 {
            return Err(ImportError::NegativeValue {
                row: row_number,
                field: COL_PRICE_EX_PPN.to_string(),
                value,
            });
        }

        Ok(Some(value))
    }
}

/// 金额文本规范化为 `f64::from_str` 可解析的形式
///
/// # 规则
/// - 去掉 "Rp" 前缀与空白
/// - 点号与逗号同时出现: 靠后的一个是小数点, 另一个是千分位
/// - 只出现一种分隔符: 出现多次视为千分位; 出现一次且其后恰好三位数字视为千分位, 否则为小数点
fn normalize_amount(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let body = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("rp") => &trimmed[2..],
        _ => trimmed,
    };
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let (thousands, decimal) = match (compact.rfind('.'), compact.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => (Some('.'), Some(',')),
        (Some(_), Some(_)) => (Some(','), Some('.')),
        (Some(_), None) => split_single_separator(&compact, '.'),
        (None, Some(_)) => split_single_separator(&compact, ','),
        (None, None) => (None, None),
    };

    if let Some(sep) = decimal {
        if compact.matches(sep).count() > 1 {
            return None;
        }
    }

    Some(
        compact
            .chars()
            .filter(|c| Some(*c) != thousands)
            .map(|c| if Some(c) == decimal { '.' } else { c })
            .collect(),
    )
}

/// 只含一种分隔符时判定其角色, 返回 (千分位, 小数点)
fn split_single_separator(compact: &str, sep: char) -> (Option<char>, Option<char>) {
    if compact.matches(sep).count() > 1 {
        return (Some(sep), None);
    }
    let fraction = compact.rsplit(sep).next().unwrap_or_default();
    if fraction.len() == 3 && fraction.chars().all(|c| c.is_ascii_digit()) {
        (Some(sep), None)
    } else {
        (None, Some(sep))
    }
}
