// ==========================================
// 状态边界测试
// ==========================================
// 职责: 验证每一次观测下 状态 ∈ 五态, 且状态-库位一致
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod state_boundary_test {
    use doa_disposition::api::DoaApi;
    use doa_disposition::domain::types::{Grade, ReturnStatus, StorageBucket};

    use crate::test_helpers::{add_record, assert_consistent, create_test_state};

    fn assert_store_consistent(api: &DoaApi) {
        for record in api.list_all().unwrap() {
            assert!(ReturnStatus::ALL.contains(&record.status()));
            assert_consistent(&record);
        }
    }

    #[test]
    fn test_every_step_consistent() {
        let state = create_test_state();
        let api: &DoaApi = &state.doa_api;

        for id in ["S1", "S2", "S3", "S4"] {
            add_record(api, id);
        }
        assert_store_consistent(api);

        let steps: Vec<Box<dyn Fn(&DoaApi) -> bool>> = vec![
            Box::new(|a: &DoaApi| a.assign_grade("S1", "A").is_ok()),
            Box::new(|a: &DoaApi| a.assign_grade("S2", "C").is_ok()),
            Box::new(|a: &DoaApi| a.send_to_service("S2").is_ok()), // 拒绝
            Box::new(|a: &DoaApi| a.send_to_service("S1").is_ok()),
            Box::new(|a: &DoaApi| a.receive_from_service("S1").is_ok()),
            Box::new(|a: &DoaApi| a.allocate("S1", "WSK").is_ok()),
            Box::new(|a: &DoaApi| a.allocate("S2", "DG").is_ok()),
            Box::new(|a: &DoaApi| a.allocate("S3", "DG").is_ok()), // 拒绝
            Box::new(|a: &DoaApi| a.assign_grade("S4", "B").is_ok()),
            Box::new(|a: &DoaApi| a.send_to_service("S4").is_ok()),
            Box::new(|a: &DoaApi| a.assign_grade("S4", "D").is_ok()), // 维修中改判
            Box::new(|a: &DoaApi| a.receive_from_service("S4").is_ok()), // 拒绝
        ];

        let outcomes: Vec<bool> = steps
            .iter()
            .map(|step| {
                let ok = step(api);
                assert_store_consistent(api);
                ok
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![true, true, false, true, true, true, true, false, true, true, true, false]
        );

        let s4 = api.get_record("S4").unwrap();
        assert_eq!(s4.status(), ReturnStatus::InClearance);
        assert_eq!(s4.storage(), StorageBucket::DamageDoa);
        assert_eq!(s4.grade(), Some(Grade::D));
    }

    #[test]
    fn test_terminal_records_stay_terminal() {
        let state = create_test_state();
        let api = &state.doa_api;
        add_record(api, "T1");
        api.assign_grade("T1", "D").unwrap();
        api.allocate("T1", "DG").unwrap();

        let before = api.get_record("T1").unwrap();
        let _ = api.assign_grade("T1", "A");
        let _ = api.send_to_service("T1");
        let _ = api.receive_from_service("T1");
        let _ = api.allocate("T1", "WSK");
        let _ = api.attach_document("T1", "photo", "late.jpg");

        let after = api.get_record("T1").unwrap();
        assert_eq!(after.stage(), before.stage());
        assert_eq!(after.documents().len(), before.documents().len());
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[test]
    fn test_documents_append_only_across_stages() {
        let state = create_test_state();
        let api = &state.doa_api;
        add_record(api, "D1");

        api.attach_document("D1", "video", "unboxing.mp4").unwrap();
        api.assign_grade("D1", "A").unwrap();
        api.attach_document("D1", "pdf", "approval.pdf").unwrap();
        api.send_to_service("D1").unwrap();
        let record = api.attach_document("D1", "jpg", "lcd.jpg").unwrap();

        let refs: Vec<&str> = record
            .documents()
            .iter()
            .map(|d| d.reference.as_str())
            .collect();
        assert_eq!(refs, vec!["unboxing.mp4", "approval.pdf", "lcd.jpg"]);
    }
}
