//! Development application lifecycle: the project store plus the stage gates
//! and metrics derived from a project's child collections.

mod checklist;
pub mod compliance;
pub mod dashboard;
mod demo;
pub mod domain;
pub mod metrics;
mod policy;
pub mod progression;
mod project;
pub mod router;
mod store;

#[cfg(test)]
mod tests;

pub use checklist::{ChecklistEntry, DocumentChecklist};
pub use compliance::{ComplianceCsvImporter, ComplianceImportError};
pub use dashboard::ProjectDashboard;
pub use domain::{
    ComplianceItem, ComplianceStatus, Condition, ConditionPatch, ConditionStatus, DaStage,
    Document, DocumentUpload, EntityKind, NewRfi, ProjectId, Rfi, RfiPatch, RfiStatus,
    StageTransition, TimelineRisk, UploadReceipt,
};
pub use policy::LifecyclePolicy;
pub use progression::Precondition;
pub use project::{Project, ProjectPatch};
pub use router::{project_router, SharedProjectStore};
pub use store::{ProjectListEntry, ProjectStore, StoreError};
