use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::checklist::DocumentChecklist;
use super::demo;
use super::domain::{
    ComplianceItem, Condition, ConditionPatch, ConditionStatus, DaStage, EntityKind, NewRfi,
    ProjectId, RfiPatch, UploadReceipt,
};
use super::policy::LifecyclePolicy;
use super::progression::{self, Precondition};
use super::project::{Project, ProjectPatch};

/// Recoverable failures returned by store operations. None of them leave a
/// project partially updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no project is currently selected")]
    NoActiveProject,
    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("precondition failed: {0}")]
    PreconditionFailed(#[from] Precondition),
    #[error("field '{field}' cannot be patched: {reason}")]
    InvalidPatch {
        field: &'static str,
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) fn not_found(entity: EntityKind, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Compact listing entry for the project picker.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListEntry {
    pub id: ProjectId,
    pub name: String,
    pub address: String,
    pub current_stage: DaStage,
    pub stage_label: &'static str,
    pub active: bool,
}

/// Owns every tracked project plus the current selection. All writes go
/// through the operations below; each one works on a copy of the active
/// project, recomputes derived metrics, and only then commits it.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    policy: LifecyclePolicy,
    projects: BTreeMap<ProjectId, Project>,
    active: Option<ProjectId>,
    sequence: u64,
}

pub(crate) const DEMO_PROJECT_ID: &str = "da-demo";

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new(LifecyclePolicy::default())
    }
}

impl ProjectStore {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self {
            policy,
            projects: BTreeMap::new(),
            active: None,
            sequence: 0,
        }
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    /// Start a blank application in pre-lodgement and make it the active one.
    pub fn create_project(&mut self, address: &str, name: &str) -> &Project {
        let id = self.next_project_id();
        let mut project = Project::new(
            id.clone(),
            name.to_string(),
            address.to_string(),
            self.policy.default_target_days(),
        );
        project.refresh(&self.policy);

        info!(project_id = %id, project_name = name, address, "created development application");
        self.commit(project)
    }

    /// Like [`ProjectStore::create_project`], seeded with a document checklist.
    pub fn create_project_with_checklist(
        &mut self,
        address: &str,
        name: &str,
        checklist: &DocumentChecklist,
    ) -> &Project {
        let id = self.next_project_id();
        let mut project = Project::new(
            id.clone(),
            name.to_string(),
            address.to_string(),
            self.policy.default_target_days(),
        );
        project.documents = checklist.documents();
        project.refresh(&self.policy);

        info!(
            project_id = %id,
            documents = project.documents().len(),
            "created development application from checklist"
        );
        self.commit(project)
    }

    /// Replace any previous demo application with a fresh, fully progressed
    /// fixture and select it.
    pub fn load_demo_project(&mut self) -> &Project {
        let mut project = demo::demo_project(ProjectId(DEMO_PROJECT_ID.to_string()));
        project.refresh(&self.policy);

        info!(project_id = DEMO_PROJECT_ID, "loaded demo application");
        self.commit(project)
    }

    /// Choose which project views operate on; `None` returns to the listing.
    pub fn select_project(&mut self, id: Option<&ProjectId>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.projects.contains_key(id) => {
                Err(StoreError::not_found(EntityKind::Project, &id.0))
            }
            Some(id) => {
                debug!(project_id = %id, "selected project");
                self.active = Some(id.clone());
                Ok(())
            }
            None => {
                debug!("cleared project selection");
                self.active = None;
                Ok(())
            }
        }
    }

    pub fn active_id(&self) -> Option<&ProjectId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Result<&Project, StoreError> {
        self.active
            .as_ref()
            .and_then(|id| self.projects.get(id))
            .ok_or(StoreError::NoActiveProject)
    }

    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn list(&self) -> Vec<ProjectListEntry> {
        self.projects
            .values()
            .map(|project| ProjectListEntry {
                id: project.id().clone(),
                name: project.name().to_string(),
                address: project.address().to_string(),
                current_stage: project.current_stage(),
                stage_label: project.current_stage().label(),
                active: self.active.as_ref() == Some(project.id()),
            })
            .collect()
    }

    pub fn update_project(&mut self, patch: ProjectPatch) -> Result<&Project, StoreError> {
        self.mutate_active("update_project", |project| project.apply_patch(patch))
    }

    /// Tick the statutory clock forward.
    pub fn advance_days(&mut self, days: u32) -> Result<&Project, StoreError> {
        self.mutate_active("advance_days", |project| {
            project.advance_days(days);
            Ok(())
        })
    }

    /// Append a consent condition. Adding one whose id or number is already
    /// tracked is a no-op.
    pub fn add_condition(&mut self, condition: Condition) -> Result<&Project, StoreError> {
        self.mutate_active("add_condition", |project| {
            let condition_id = condition.id.clone();
            if !project.push_condition(condition) {
                debug!(%condition_id, "condition already tracked; skipping");
            }
            Ok(())
        })
    }

    pub fn update_condition(
        &mut self,
        condition_id: &str,
        patch: ConditionPatch,
    ) -> Result<&Project, StoreError> {
        self.mutate_active("update_condition", |project| {
            project.patch_condition(condition_id, patch)
        })
    }

    /// Correction path for moving a condition back to an earlier status.
    pub fn revert_condition(
        &mut self,
        condition_id: &str,
        status: ConditionStatus,
    ) -> Result<&Project, StoreError> {
        self.mutate_active("revert_condition", |project| {
            project.revert_condition(condition_id, status)
        })
    }

    pub fn issue_rfi(&mut self, rfi: NewRfi) -> Result<&Project, StoreError> {
        self.mutate_active("issue_rfi", |project| project.issue_rfi(rfi))
    }

    pub fn update_rfi(&mut self, rfi_id: &str, patch: RfiPatch) -> Result<&Project, StoreError> {
        self.mutate_active("update_rfi", |project| project.patch_rfi(rfi_id, patch))
    }

    /// Record metadata for an upload completed by the document store.
    pub fn record_document_upload(
        &mut self,
        document_id: &str,
        receipt: UploadReceipt,
    ) -> Result<&Project, StoreError> {
        self.mutate_active("record_document_upload", |project| {
            project.record_upload(document_id, receipt)
        })
    }

    pub fn record_compliance_item(&mut self, item: ComplianceItem) -> Result<&Project, StoreError> {
        self.record_compliance_items(vec![item])
    }

    /// Append compliance-check results. A result whose id matches a pending
    /// check replaces it; the batch is rejected as a whole when any id repeats
    /// within it or matches a settled check.
    pub fn record_compliance_items(
        &mut self,
        items: Vec<ComplianceItem>,
    ) -> Result<&Project, StoreError> {
        self.mutate_active("record_compliance_items", |project| {
            project.record_compliance(items)
        })
    }

    pub fn record_lodgement(&mut self, reference: &str) -> Result<&Project, StoreError> {
        self.mutate_active("record_lodgement", |project| {
            project.record_lodgement(reference)
        })
    }

    pub fn accept_conditions(&mut self) -> Result<&Project, StoreError> {
        self.mutate_active("accept_conditions", Project::accept_conditions)
    }

    /// Move the active project into its next stage once that stage's gate is
    /// satisfied.
    pub fn advance_stage(&mut self, on: NaiveDate) -> Result<&Project, StoreError> {
        let policy = self.policy;
        self.mutate_active("advance_stage", |project| {
            let from = project.current_stage();
            let next = progression::check_advance(project, &policy)?;
            project.enter_stage(next, on);
            info!(
                project_id = %project.id(),
                from = from.label(),
                to = next.label(),
                "advanced development application"
            );
            Ok(())
        })
    }

    fn mutate_active<F>(
        &mut self,
        operation: &'static str,
        apply: F,
    ) -> Result<&Project, StoreError>
    where
        F: FnOnce(&mut Project) -> Result<(), StoreError>,
    {
        let mut draft = self.active()?.clone();

        if let Err(err) = apply(&mut draft) {
            debug!(operation, project_id = %draft.id(), error = %err, "store operation rejected");
            return Err(err);
        }

        draft.refresh(&self.policy);
        debug!(
            operation,
            project_id = %draft.id(),
            compliance_score = draft.compliance_score(),
            completion_percent = draft.completion_percent(),
            "store operation applied"
        );
        Ok(self.commit(draft))
    }

    fn commit(&mut self, project: Project) -> &Project {
        let id = project.id().clone();
        self.active = Some(id.clone());
        self.projects.insert(id.clone(), project);
        &self.projects[&id]
    }

    fn next_project_id(&mut self) -> ProjectId {
        self.sequence += 1;
        ProjectId(format!("da-{:06}", self.sequence))
    }
}
