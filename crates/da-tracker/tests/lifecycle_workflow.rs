//! End-to-end walk of a development application through the public store API,
//! from an empty checklist to post-consent.

use chrono::NaiveDate;
use da_tracker::lifecycle::{
    ComplianceCsvImporter, ComplianceImportError, Condition, ConditionPatch, ConditionStatus,
    DaStage, DocumentChecklist, NewRfi, Precondition, ProjectDashboard, ProjectStore, RfiPatch,
    RfiStatus, StoreError, TimelineRisk, UploadReceipt,
};

const COMPLIANCE_TABLE: &str = "ID,Category,Control,Requirement,Proposal,Status,Notes\n\
height,Built Form,LEP cl 4.3,Max height 9.5m,8.9m,Compliant,\n\
fsr,Built Form,LEP cl 4.4,Max FSR 0.5:1,0.48:1,Compliant,\n\
front-setback,Setbacks,DCP 3.2,Front setback 6m,6.2m,Compliant,\n\
side-setback,Setbacks,DCP 3.3,Side setback 0.9m,0.75m,Variation,Cl 4.6 request lodged\n\
rear-setback,Setbacks,DCP 3.4,Rear setback 8m,8.5m,Compliant,\n\
landscaping,Landscape,DCP 4.1,Min 35% landscaped area,38%,Compliant,\n\
parking,Access,DCP 5.1,2 spaces per dwelling,2 spaces,Compliant,\n\
solar,Amenity,DCP 6.2,3h winter sun to living areas,3.5h,Compliant,\n\
privacy,Amenity,DCP 6.4,Screened windows within 9m,Screens provided,Complies,\n\
stormwater,Engineering,DCP 8.1,OSD to council spec,OSD tank 10kL,yes,\n";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn condition(id: &str, number: u32, category: &str) -> Condition {
    Condition {
        id: id.to_string(),
        number,
        category: category.to_string(),
        requirement: "Submit construction management plan".to_string(),
        trigger: "Prior to construction certificate".to_string(),
        responsible: "Builder".to_string(),
        status: ConditionStatus::NotStarted,
    }
}

#[test]
fn application_walks_every_gate_to_post_consent() {
    let mut store = ProjectStore::default();
    let checklist = DocumentChecklist::standard();
    let project =
        store.create_project_with_checklist("12 Example Avenue", "Dual occupancy", &checklist);
    assert_eq!(project.completion_percent(), 0);
    assert_eq!(project.compliance_score(), 0);

    let required: Vec<String> = project
        .documents()
        .iter()
        .filter(|doc| doc.required)
        .map(|doc| doc.id.clone())
        .collect();
    for document_id in &required {
        store
            .record_document_upload(
                document_id,
                UploadReceipt {
                    upload_date: date(2024, 3, 20),
                    size_bytes: 250_000,
                },
            )
            .expect("upload recorded");
    }
    assert_eq!(store.active().expect("active").completion_percent(), 100);

    let project = ComplianceCsvImporter::import_into(&mut store, COMPLIANCE_TABLE.as_bytes())
        .expect("compliance table imports");
    assert_eq!(project.compliance_items().len(), 10);
    assert_eq!(project.compliance_score(), 95);

    store.advance_stage(date(2024, 4, 1)).expect("lodgement");
    store.record_lodgement("DA-2024/0311").expect("reference");
    store.advance_days(5).expect("clock ticks");
    let project = store.advance_stage(date(2024, 4, 6)).expect("assessment");
    assert_eq!(project.days_elapsed(), 0);

    store
        .issue_rfi(NewRfi {
            id: "rfi-1".to_string(),
            requirement: "Provide shadow diagrams for 9am and 3pm".to_string(),
            category: "Amenity".to_string(),
            officer: "J. Nguyen".to_string(),
            date: date(2024, 4, 20),
            deadline: date(2024, 5, 4),
        })
        .expect("rfi issued");
    store.advance_days(25).expect("clock ticks");

    let project = store.active().expect("active");
    let dashboard = ProjectDashboard::build(project, store.policy(), date(2024, 5, 10));
    assert_eq!(dashboard.timeline_risk, TimelineRisk::Monitor);
    assert_eq!(dashboard.overdue_rfis, 1);
    assert!(dashboard.next_gate_blocker.is_some());

    store
        .update_rfi(
            "rfi-1",
            RfiPatch {
                status: Some(RfiStatus::Resolved),
                response: Some("Shadow diagrams uploaded".to_string()),
                ..RfiPatch::default()
            },
        )
        .expect("rfi resolved");
    store.advance_stage(date(2024, 5, 12)).expect("determination");

    store
        .add_condition(condition("c1", 1, "Prior to CC"))
        .expect("condition added");
    let project = store
        .add_condition(condition("c2", 2, "Prior to OC"))
        .expect("condition added");
    // 9 documents + 0 of 2 conditions
    assert_eq!(project.completion_percent(), 82);

    store.accept_conditions().expect("conditions accepted");
    store.advance_stage(date(2024, 5, 20)).expect("post-consent");

    for id in ["c1", "c2"] {
        store
            .update_condition(
                id,
                ConditionPatch {
                    status: Some(ConditionStatus::Completed),
                    ..ConditionPatch::default()
                },
            )
            .expect("condition completed");
    }

    let project = store.active().expect("active");
    assert_eq!(project.current_stage(), DaStage::PostConsent);
    assert_eq!(project.completion_percent(), 100);
    assert_eq!(project.stage_history().len(), 4);

    let err = store
        .advance_stage(date(2024, 6, 1))
        .expect_err("nothing after post-consent");
    assert_eq!(err, StoreError::PreconditionFailed(Precondition::FinalStage));
}

#[test]
fn failed_import_leaves_project_untouched() {
    let mut store = ProjectStore::default();
    store.create_project("3 Harbour Rd", "Alterations");
    let csv = "ID,Category,Control,Requirement,Proposal,Status,Notes\n\
height,Built Form,LEP cl 4.3,Max height 9.5m,8.9m,Compliant,\n\
fsr,Built Form,LEP cl 4.4,Max FSR 0.5:1,0.61:1,maybe,\n";

    let err = ComplianceCsvImporter::import_into(&mut store, csv.as_bytes())
        .expect_err("unknown status rejected");
    assert!(matches!(
        err,
        ComplianceImportError::UnknownStatus { line: 3, ref value } if value == "maybe"
    ));

    let project = store.active().expect("active");
    assert!(project.compliance_items().is_empty());
    assert_eq!(project.compliance_score(), 0);
}

#[test]
fn selection_scopes_mutations_to_the_active_project() {
    let mut store = ProjectStore::default();
    let first = store.create_project("1 Smith St", "New Build").id().clone();
    let second = store.create_project("2 Smith St", "Pool").id().clone();
    assert_eq!(store.active_id(), Some(&second));

    store.select_project(Some(&first)).expect("select first");
    store.advance_days(7).expect("clock ticks");

    assert_eq!(store.get(&first).expect("first").days_elapsed(), 7);
    assert_eq!(store.get(&second).expect("second").days_elapsed(), 0);

    store.select_project(None).expect("clear selection");
    assert_eq!(store.advance_days(1).expect_err("no project"), StoreError::NoActiveProject);
    assert_eq!(store.list().len(), 2);
}
