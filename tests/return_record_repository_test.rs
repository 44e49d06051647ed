// ==========================================
// 退货记录仓储集成测试
// ==========================================
// 职责: 验证入库、文本检索、谓词查询
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod return_record_repository_test {
    use doa_disposition::api::ApiError;
    use doa_disposition::domain::types::ReturnStatus;

    use crate::test_helpers::{create_test_state, RecordBuilder};

    fn ids(records: Vec<doa_disposition::ReturnRecord>) -> Vec<String> {
        records.into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_filter_by_text_over_all_fields() {
        let state = create_test_state();
        let api = &state.doa_api;

        api.add(
            RecordBuilder::new("R1")
                .imei("356111111111111")
                .sku("IP15-128")
                .product("iPhone 15")
                .dealer("GDN3 Roxy")
                .invoice("INV-001")
                .build(),
        )
        .unwrap();
        api.add(
            RecordBuilder::new("R2")
                .imei("356222222222222")
                .sku("SM-S931")
                .product("Galaxy S25")
                .no_dealer()
                .invoice("INV-002")
                .build(),
        )
        .unwrap();
        api.add(
            RecordBuilder::new("R3")
                .imei("356333333333333")
                .sku("RN13")
                .product("Redmi Note 13")
                .dealer("Erafone Mangga Dua")
                .invoice("FKT-77")
                .build(),
        )
        .unwrap();

        // 空文本返回全部（插入顺序）
        assert_eq!(ids(api.filter_by_text("").unwrap()), vec!["R1", "R2", "R3"]);

        // 各字段部分匹配, 大小写不敏感
        assert_eq!(ids(api.filter_by_text("3562").unwrap()), vec!["R2"]);
        assert_eq!(ids(api.filter_by_text("sm-s9").unwrap()), vec!["R2"]);
        assert_eq!(ids(api.filter_by_text("REDMI").unwrap()), vec!["R3"]);
        assert_eq!(ids(api.filter_by_text("roxy").unwrap()), vec!["R1"]);
        assert_eq!(ids(api.filter_by_text("inv-").unwrap()), vec!["R1", "R2"]);

        // 缺失字段按空串处理
        assert!(api.filter_by_text("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_generated_and_duplicate_ids() {
        let state = create_test_state();
        let api = &state.doa_api;

        let first = api.add(RecordBuilder::generated().build()).unwrap();
        assert_eq!(first.id, "DOA-0001");

        api.add(RecordBuilder::new("DOA-0002").build()).unwrap();
        let third = api.add(RecordBuilder::generated().build()).unwrap();
        assert_eq!(third.id, "DOA-0003");

        let err = api.add(RecordBuilder::new("DOA-0002").build()).unwrap_err();
        assert!(matches!(err, ApiError::DuplicateId(ref id) if id == "DOA-0002"));
        assert_eq!(api.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_query_predicate() {
        let state = create_test_state();
        let api = &state.doa_api;
        for (id, price) in [("Q1", 500_000.0), ("Q2", 9_000_000.0), ("Q3", 15_000_000.0)] {
            api.add(RecordBuilder::new(id).price(price).build()).unwrap();
        }
        api.assign_grade("Q3", "C").unwrap();

        let expensive = api.query(|r| r.price_ex_ppn > 1_000_000.0).unwrap();
        assert_eq!(ids(expensive), vec!["Q2", "Q3"]);

        let inbound_expensive = api
            .query(|r| r.price_ex_ppn > 1_000_000.0 && r.status() == ReturnStatus::Inbound)
            .unwrap();
        assert_eq!(ids(inbound_expensive), vec!["Q2"]);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let state = create_test_state();
        let err = state
            .doa_api
            .add(RecordBuilder::new("N1").price(-10.0).build())
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(state.doa_api.list_all().unwrap().is_empty());
    }
}
