// ==========================================
// D.O.A 退货处置系统 - 汇总统计引擎
// ==========================================
// 职责: 从记录快照派生计数、等级分布、估值
// 红线: 只读; 不缓存, 每次基于调用时快照计算
// ==========================================

use crate::domain::return_record::ReturnRecord;
use crate::domain::types::{Grade, GradeRoute, ReturnStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// DoaOverview - 总览卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoaOverview {
    pub total: usize,        // 退货总数
    pub at_service: usize,   // 送修链路（WaitingService + AtMitracare）
    pub in_clearance: usize, // 清仓待分配
    pub finished: usize,     // 已处置（WSK/DG）
}

// ==========================================
// GradeShare - 等级分布项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeShare {
    pub grade: Grade,
    pub label: String,            // "Grade A"
    pub severity: String,         // 损坏程度说明
    pub route: GradeRoute,        // 流转路径
    pub count: usize,
    pub ratio: f64,               // 占已定级记录比例（0..=1）
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoaAggregator;

impl DoaAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 按状态计数（五个状态全部出现, 无记录为 0）
    pub fn count_by_status(&self, records: &[ReturnRecord]) -> BTreeMap<ReturnStatus, usize> {
        let mut counts: BTreeMap<ReturnStatus, usize> =
            ReturnStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for record in records {
            *counts.entry(record.status()).or_insert(0) += 1;
        }
        counts
    }

    /// 按等级计数（未定级不计入）
    pub fn count_by_grade(&self, records: &[ReturnRecord]) -> BTreeMap<Grade, usize> {
        let mut counts: BTreeMap<Grade, usize> = Grade::ALL.iter().map(|g| (*g, 0)).collect();
        for grade in records.iter().filter_map(|r| r.grade()) {
            *counts.entry(grade).or_insert(0) += 1;
        }
        counts
    }

    /// 已处置数（库位 WSK/DG）
    pub fn total_finished(&self, records: &[ReturnRecord]) -> usize {
        records.iter().filter(|r| r.storage().is_final()).count()
    }

    /// 总览卡片
    pub fn overview(&self, records: &[ReturnRecord]) -> DoaOverview {
        let by_status = self.count_by_status(records);
        let count_of = |s: ReturnStatus| by_status.get(&s).copied().unwrap_or(0);

        DoaOverview {
            total: records.len(),
            at_service: count_of(ReturnStatus::WaitingService) + count_of(ReturnStatus::AtMitracare),
            in_clearance: count_of(ReturnStatus::InClearance),
            finished: self.total_finished(records),
        }
    }

    /// 等级分布（A→D 顺序）
    pub fn grade_distribution(&self, records: &[ReturnRecord]) -> Vec<GradeShare> {
        let counts = self.count_by_grade(records);
        let graded: usize = counts.values().sum();

        counts
            .into_iter()
            .map(|(grade, count)| GradeShare {
                grade,
                label: format!("Grade {}", grade),
                severity: grade.severity().to_string(),
                route: grade.route(),
                count,
                ratio: if graded == 0 {
                    0.0
                } else {
                    count as f64 / graded as f64
                },
            })
            .collect()
    }

    /// 按状态汇总不含税估值
    pub fn valuation_by_status(&self, records: &[ReturnRecord]) -> BTreeMap<ReturnStatus, f64> {
        let mut totals: BTreeMap<ReturnStatus, f64> =
            ReturnStatus::ALL.iter().map(|s| (*s, 0.0)).collect();
        for record in records {
            *totals.entry(record.status()).or_insert(0.0) += record.price_ex_ppn;
        }
        totals
    }
}
