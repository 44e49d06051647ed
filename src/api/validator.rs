// ==========================================
// D.O.A 退货处置系统 - 输入校验器
// ==========================================
// 职责: 展示层输入的边界校验（流程规则由引擎层负责）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::return_record::{NewReturnRecord, ReturnRecordPatch};

/// 文本字段长度上限（字符）
pub const MAX_TEXT_LEN: usize = 512;

/// 校验记录ID参数
pub fn validate_record_id(id: &str) -> ApiResult<()> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
    }
    Ok(())
}

/// 校验入库参数
pub fn validate_new_record(input: &NewReturnRecord) -> ApiResult<()> {
    if !input.price_ex_ppn.is_finite() || input.price_ex_ppn < 0.0 {
        return Err(ApiError::InvalidInput(format!(
            "不含税价格必须为非负数: {}",
            input.price_ex_ppn
        )));
    }

    let fields = [
        ("imei", &input.imei),
        ("sku", &input.sku),
        ("product", &input.product),
        ("dealer", &input.dealer),
        ("invoice", &input.invoice),
        ("damage_type", &input.damage_type),
        ("description", &input.description),
    ];
    for (name, value) in fields {
        validate_text(name, value.as_deref())?;
    }

    Ok(())
}

/// 校验检验备注补丁
pub fn validate_patch(patch: &ReturnRecordPatch) -> ApiResult<()> {
    if patch.is_empty() {
        return Err(ApiError::InvalidInput("补丁内容为空".to_string()));
    }
    validate_text("damage_type", patch.damage_type.as_deref())?;
    validate_text("description", patch.description.as_deref())?;
    for document in &patch.documents {
        validate_reference(&document.reference)?;
    }
    Ok(())
}

/// 校验文档引用（不透明字符串, 只要求非空）
pub fn validate_reference(reference: &str) -> ApiResult<()> {
    if reference.trim().is_empty() {
        return Err(ApiError::InvalidInput("文档引用不能为空".to_string()));
    }
    Ok(())
}

fn validate_text(field: &str, value: Option<&str>) -> ApiResult<()> {
    match value {
        Some(v) if v.chars().count() > MAX_TEXT_LEN => Err(ApiError::InvalidInput(format!(
            "字段{}超过{}个字符",
            field, MAX_TEXT_LEN
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_record_price() {
        let input = NewReturnRecord {
            price_ex_ppn: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_new_record(&input),
            Err(ApiError::InvalidInput(_))
        ));

        let input = NewReturnRecord {
            price_ex_ppn: f64::NAN,
            ..Default::default()
        };
        assert!(validate_new_record(&input).is_err());
        assert!(validate_new_record(&NewReturnRecord::default()).is_ok());
    }

    #[test]
    fn test_validate_text_length() {
        let input = NewReturnRecord {
            description: Some("x".repeat(MAX_TEXT_LEN + 1)),
            ..Default::default()
        };
        assert!(validate_new_record(&input).is_err());
    }

    #[test]
    fn test_validate_patch() {
        assert!(validate_patch(&ReturnRecordPatch::default()).is_err());
        let patch = ReturnRecordPatch {
            damage_type: Some("LCD".to_string()),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_validate_record_id() {
        assert!(validate_record_id("  ").is_err());
        assert!(validate_record_id("DOA-0001").is_ok());
    }
}
