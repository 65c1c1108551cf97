use chrono::NaiveDate;

use super::checklist::DocumentChecklist;
use super::domain::{
    ComplianceItem, ComplianceStatus, Condition, ConditionStatus, DaStage, DocumentUpload,
    ProjectId, Rfi, RfiStatus, StageTransition,
};
use super::project::Project;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// A dwelling application that has been through every gate and is now
/// discharging its consent conditions. Derived metrics are left for the store
/// to compute.
pub(crate) fn demo_project(id: ProjectId) -> Project {
    let mut project = Project::new(
        id,
        "Two-Storey Dwelling with Pool".to_string(),
        "42 Harbour View Road, Mosman NSW 2088".to_string(),
        40,
    );

    project.documents = DocumentChecklist::standard().documents();
    for (index, document) in project.documents.iter_mut().enumerate() {
        document.upload = Some(DocumentUpload {
            version: 1 + (index % 2) as u32,
            upload_date: date(2024, 2, 5 + index as u32),
            size_bytes: 250_000 + index as u64 * 48_000,
        });
    }

    project.compliance_items = demo_compliance_items();
    project.rfis = demo_rfis();
    project.conditions = demo_conditions();
    project.stage_history = vec![
        StageTransition {
            from: DaStage::PreLodgement,
            to: DaStage::Lodgement,
            on: date(2024, 2, 20),
        },
        StageTransition {
            from: DaStage::Lodgement,
            to: DaStage::Assessment,
            on: date(2024, 2, 27),
        },
        StageTransition {
            from: DaStage::Assessment,
            to: DaStage::Determination,
            on: date(2024, 4, 2),
        },
        StageTransition {
            from: DaStage::Determination,
            to: DaStage::PostConsent,
            on: date(2024, 4, 9),
        },
    ];
    project.seed_lifecycle(DaStage::PostConsent, 36, Some("DA-2024/0117".to_string()), true);
    project
}

fn compliance(
    id: &str,
    category: &str,
    control: &str,
    requirement: &str,
    proposal: &str,
    status: ComplianceStatus,
    notes: Option<&str>,
) -> ComplianceItem {
    ComplianceItem {
        id: id.to_string(),
        category: category.to_string(),
        control: control.to_string(),
        requirement: requirement.to_string(),
        proposal: proposal.to_string(),
        status,
        notes: notes.map(str::to_string),
    }
}

fn demo_compliance_items() -> Vec<ComplianceItem> {
    use ComplianceStatus::{Compliant, Variation};

    vec![
        compliance(
            "lep-height",
            "Built Form",
            "LEP cl 4.3",
            "Maximum building height 8.5m",
            "8.2m",
            Compliant,
            None,
        ),
        compliance(
            "lep-fsr",
            "Built Form",
            "LEP cl 4.4",
            "Maximum FSR 0.5:1",
            "0.48:1",
            Compliant,
            None,
        ),
        compliance(
            "dcp-front-setback",
            "Setbacks",
            "DCP 4.1.2",
            "Front setback 7.5m",
            "7.5m",
            Compliant,
            None,
        ),
        compliance(
            "dcp-side-setback",
            "Setbacks",
            "DCP 4.1.3",
            "Side setback 1.5m",
            "1.2m (eastern boundary)",
            Variation,
            Some("Clause 4.6 request lodged; no overshadowing impact"),
        ),
        compliance(
            "dcp-landscaped-area",
            "Landscaping",
            "DCP 4.3.1",
            "Minimum 40% landscaped area",
            "44%",
            Compliant,
            None,
        ),
        compliance(
            "dcp-private-open-space",
            "Amenity",
            "DCP 4.4.2",
            "Private open space 80m2",
            "112m2",
            Compliant,
            None,
        ),
        compliance(
            "dcp-solar-access",
            "Amenity",
            "DCP 4.4.5",
            "3 hours solar access to neighbour POS",
            "3.5 hours",
            Compliant,
            None,
        ),
        compliance(
            "dcp-parking",
            "Access",
            "DCP 5.2",
            "Two car spaces",
            "Two car spaces",
            Compliant,
            None,
        ),
        compliance(
            "dcp-pool-siting",
            "Ancillary",
            "DCP 6.1",
            "Pool 1m from boundary",
            "1.4m",
            Compliant,
            None,
        ),
        compliance(
            "basix",
            "Sustainability",
            "BASIX",
            "Certificate commitments met",
            "Certificate 1432567S",
            Compliant,
            None,
        ),
    ]
}

fn demo_rfis() -> Vec<Rfi> {
    vec![
        Rfi {
            id: "rfi-1".to_string(),
            requirement: "Provide amended stormwater plan showing on-site detention".to_string(),
            category: "Engineering".to_string(),
            officer: "J. Nguyen".to_string(),
            date: date(2024, 3, 6),
            deadline: date(2024, 3, 20),
            status: RfiStatus::Resolved,
            response: Some(
                "Amended stormwater plan Rev C uploaded with OSD tank sizing.".to_string(),
            ),
        },
        Rfi {
            id: "rfi-2".to_string(),
            requirement: "Clarify eastern side setback variation justification".to_string(),
            category: "Planning".to_string(),
            officer: "J. Nguyen".to_string(),
            date: date(2024, 3, 6),
            deadline: date(2024, 3, 20),
            status: RfiStatus::Resolved,
            response: Some(
                "Clause 4.6 written request provided with shadow analysis.".to_string(),
            ),
        },
    ]
}

fn condition(
    id: &str,
    number: u32,
    category: &str,
    requirement: &str,
    trigger: &str,
    responsible: &str,
    status: ConditionStatus,
) -> Condition {
    Condition {
        id: id.to_string(),
        number,
        category: category.to_string(),
        requirement: requirement.to_string(),
        trigger: trigger.to_string(),
        responsible: responsible.to_string(),
        status,
    }
}

fn demo_conditions() -> Vec<Condition> {
    use ConditionStatus::{Completed, InProgress, NotStarted, Verified};

    vec![
        condition(
            "cond-1",
            1,
            "General",
            "Development in accordance with approved plans",
            "Ongoing",
            "Applicant",
            Verified,
        ),
        condition(
            "cond-2",
            2,
            "Prior to Construction Certificate",
            "Pay Section 7.12 contributions",
            "Prior to CC",
            "Applicant",
            Completed,
        ),
        condition(
            "cond-3",
            3,
            "Prior to Construction Certificate",
            "Submit detailed stormwater design",
            "Prior to CC",
            "Engineer",
            Completed,
        ),
        condition(
            "cond-4",
            4,
            "Prior to Commencement",
            "Install erosion and sediment controls",
            "Prior to works",
            "Builder",
            InProgress,
        ),
        condition(
            "cond-5",
            5,
            "During Construction",
            "Restrict work hours to 7am-5pm weekdays",
            "During works",
            "Builder",
            NotStarted,
        ),
        condition(
            "cond-6",
            6,
            "Prior to Occupation",
            "Pool safety barrier certificate",
            "Prior to OC",
            "Certifier",
            NotStarted,
        ),
    ]
}
