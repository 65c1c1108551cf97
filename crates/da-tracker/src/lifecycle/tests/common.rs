use chrono::NaiveDate;

use crate::lifecycle::domain::{
    ComplianceItem, ComplianceStatus, Condition, ConditionStatus, NewRfi,
};
use crate::lifecycle::store::ProjectStore;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn compliance_item(id: &str, status: ComplianceStatus) -> ComplianceItem {
    ComplianceItem {
        id: id.to_string(),
        category: "Built Form".to_string(),
        control: "LEP cl 4.3".to_string(),
        requirement: "Maximum building height 9.5m".to_string(),
        proposal: "9.2m".to_string(),
        status,
        notes: None,
    }
}

/// Ten checks: eight compliant, one variation, one non-compliant.
pub(super) fn mixed_compliance_items() -> Vec<ComplianceItem> {
    let mut items: Vec<ComplianceItem> = (1..=8)
        .map(|n| compliance_item(&format!("ok-{n}"), ComplianceStatus::Compliant))
        .collect();
    items.push(compliance_item("setback", ComplianceStatus::Variation));
    items.push(compliance_item("parking", ComplianceStatus::NonCompliant));
    items
}

pub(super) fn passing_compliance_items() -> Vec<ComplianceItem> {
    (1..=10)
        .map(|n| compliance_item(&format!("pass-{n}"), ComplianceStatus::Compliant))
        .collect()
}

pub(super) fn condition(id: &str, number: u32, category: &str) -> Condition {
    Condition {
        id: id.to_string(),
        number,
        category: category.to_string(),
        requirement: "Provide construction management plan".to_string(),
        trigger: "Prior to CC".to_string(),
        responsible: "Builder".to_string(),
        status: ConditionStatus::NotStarted,
    }
}

pub(super) fn new_rfi(id: &str) -> NewRfi {
    NewRfi {
        id: id.to_string(),
        requirement: "Provide amended landscape plan".to_string(),
        category: "Landscaping".to_string(),
        officer: "A. Patel".to_string(),
        date: date(2024, 5, 1),
        deadline: date(2024, 5, 15),
    }
}

pub(super) fn store_with_project() -> ProjectStore {
    let mut store = ProjectStore::default();
    store.create_project("1 Smith St", "New Build");
    store
}

/// A project walked through lodgement into assessment.
pub(super) fn store_in_assessment() -> ProjectStore {
    let mut store = store_with_project();
    store
        .record_compliance_items(passing_compliance_items())
        .expect("compliance recorded");
    store
        .advance_stage(date(2024, 4, 1))
        .expect("advance to lodgement");
    store
        .record_lodgement("DA-2024/0042")
        .expect("lodgement recorded");
    store
        .advance_stage(date(2024, 4, 8))
        .expect("advance to assessment");
    store
}
