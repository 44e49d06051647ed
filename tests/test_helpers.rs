// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的 AppState 初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use doa_disposition::api::DoaApi;
use doa_disposition::app::AppState;
use doa_disposition::config::ConfigManager;
use doa_disposition::domain::return_record::{NewReturnRecord, ReturnRecord};
use doa_disposition::domain::types::{ReturnStatus, StorageBucket};
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建默认配置的测试 AppState
pub fn create_test_state() -> AppState {
    doa_disposition::logging::init_test();
    AppState::new(ConfigManager::new()).expect("AppState 初始化失败")
}

/// 退货记录构建器
pub struct RecordBuilder {
    input: NewReturnRecord,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            input: NewReturnRecord {
                id: Some(id.to_string()),
                imei: Some(format!("35678901{:07}", id.len())),
                sku: Some("SKU-IP15-128".to_string()),
                product: Some("iPhone 15 128GB".to_string()),
                dealer: Some("GDN3 Roxy Square".to_string()),
                invoice: Some(format!("INV/{}", id)),
                price_ex_ppn: 12_500_000.0,
                ..Default::default()
            },
        }
    }

    /// 不带ID（由仓储生成）
    pub fn generated() -> Self {
        let mut builder = Self::new("");
        builder.input.id = None;
        builder.input.invoice = Some("INV/GEN".to_string());
        builder
    }

    pub fn imei(mut self, imei: &str) -> Self {
        self.input.imei = Some(imei.to_string());
        self
    }

    pub fn sku(mut self, sku: &str) -> Self {
        self.input.sku = Some(sku.to_string());
        self
    }

    pub fn product(mut self, product: &str) -> Self {
        self.input.product = Some(product.to_string());
        self
    }

    pub fn dealer(mut self, dealer: &str) -> Self {
        self.input.dealer = Some(dealer.to_string());
        self
    }

    pub fn invoice(mut self, invoice: &str) -> Self {
        self.input.invoice = Some(invoice.to_string());
        self
    }

    pub fn no_dealer(mut self) -> Self {
        self.input.dealer = None;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.input.price_ex_ppn = price;
        self
    }

    pub fn build(self) -> NewReturnRecord {
        self.input
    }
}

/// 入库一条默认记录
pub fn add_record(api: &DoaApi, id: &str) -> ReturnRecord {
    api.add(RecordBuilder::new(id).build())
        .expect("新增退货记录失败")
}

/// 断言状态-库位一致性
pub fn assert_consistent(record: &ReturnRecord) {
    let storage = record.storage();
    let ok = match record.status() {
        ReturnStatus::Inbound => storage == StorageBucket::Unassigned,
        ReturnStatus::WaitingService | ReturnStatus::AtMitracare => {
            storage == StorageBucket::DamageDoa
        }
        ReturnStatus::InClearance => {
            storage == StorageBucket::DamageDoa || storage == StorageBucket::Clearance
        }
        ReturnStatus::Finished => storage == StorageBucket::Wsk || storage == StorageBucket::Dg,
    };
    assert!(
        ok,
        "状态与库位不一致: id={}, status={}, storage={}",
        record.id,
        record.status(),
        storage
    );
}

/// 写临时 CSV 文件
pub fn write_temp_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时文件失败");
    for line in lines {
        writeln!(file, "{}", line).expect("写入临时文件失败");
    }
    file
}
