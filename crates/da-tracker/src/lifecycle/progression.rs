use serde::Serialize;

use super::domain::{DaStage, EntityKind, RfiStatus};
use super::policy::LifecyclePolicy;
use super::project::Project;

/// A requirement that was not satisfied when a mutation or stage advance was
/// attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Precondition {
    #[error("compliance score {score} is below the lodgement threshold of {threshold}")]
    ComplianceBelowThreshold { score: u8, threshold: u8 },
    #[error("a lodgement reference must be recorded before assessment can begin")]
    LodgementReferenceMissing,
    #[error("{outstanding} RFI(s) must be resolved before determination")]
    UnresolvedRfis { outstanding: usize },
    #[error("consent conditions must be accepted before moving to post-consent")]
    ConditionsNotAccepted,
    #[error("project is already in the final stage")]
    FinalStage,
    #[error("{operation} is only available during {expected:?} (project is in {actual:?})")]
    WrongStage {
        operation: &'static str,
        expected: DaStage,
        actual: DaStage,
    },
    #[error("RFI '{rfi_id}' needs a non-empty response once it leaves pending")]
    ResponseRequired { rfi_id: String },
    #[error("{entity} '{id}' cannot move back from {from} to {to}")]
    StatusRegression {
        entity: EntityKind,
        id: String,
        from: &'static str,
        to: &'static str,
    },
    #[error("{entity} '{id}' already exists")]
    Duplicate { entity: EntityKind, id: String },
    #[error("lodgement reference must not be empty")]
    EmptyLodgementReference,
}

/// Checks the gate out of the project's current stage, returning the stage it
/// may move into.
pub fn check_advance(project: &Project, policy: &LifecyclePolicy) -> Result<DaStage, Precondition> {
    let current = project.current_stage();
    let next = current.next().ok_or(Precondition::FinalStage)?;

    match current {
        DaStage::PreLodgement => {
            let score = project.compliance_score();
            let threshold = policy.lodgement_threshold();
            if score < threshold {
                return Err(Precondition::ComplianceBelowThreshold { score, threshold });
            }
        }
        DaStage::Lodgement => {
            if project.lodgement_reference().is_none() {
                return Err(Precondition::LodgementReferenceMissing);
            }
        }
        DaStage::Assessment => {
            let outstanding = project
                .rfis()
                .iter()
                .filter(|rfi| rfi.status != RfiStatus::Resolved)
                .count();
            if outstanding > 0 {
                return Err(Precondition::UnresolvedRfis { outstanding });
            }
        }
        DaStage::Determination => {
            if !project.conditions_accepted() {
                return Err(Precondition::ConditionsNotAccepted);
            }
        }
        DaStage::PostConsent => return Err(Precondition::FinalStage),
    }

    Ok(next)
}

/// Requires the project to sit in `expected` for stage-bound actions such as
/// recording a lodgement reference.
pub(crate) fn require_stage(
    project: &Project,
    operation: &'static str,
    expected: DaStage,
) -> Result<(), Precondition> {
    let actual = project.current_stage();
    if actual == expected {
        Ok(())
    } else {
        Err(Precondition::WrongStage {
            operation,
            expected,
            actual,
        })
    }
}
