use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ComplianceItem, ComplianceStatus, Condition, ConditionPatch, ConditionStatus, DaStage,
    Document, DocumentUpload, EntityKind, NewRfi, ProjectId, Rfi, RfiPatch, RfiStatus,
    StageTransition, UploadReceipt,
};
use super::metrics;
use super::policy::LifecyclePolicy;
use super::progression::{require_stage, Precondition};
use super::store::StoreError;

/// Root aggregate for one development application.
///
/// The compliance score and completion percentage are only ever written by
/// [`Project::refresh`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    address: String,
    current_stage: DaStage,
    days_elapsed: u32,
    target_days: u32,
    compliance_score: u8,
    completion_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    lodgement_reference: Option<String>,
    conditions_accepted: bool,
    pub(crate) documents: Vec<Document>,
    pub(crate) rfis: Vec<Rfi>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) compliance_items: Vec<ComplianceItem>,
    pub(crate) stage_history: Vec<StageTransition>,
}

/// Shallow update for the project's editable fields.
///
/// `current_stage`, `compliance_score` and `completion_percent` are accepted on
/// the wire only to be rejected by [`ProjectPatch::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub days_elapsed: Option<u32>,
    pub target_days: Option<u32>,
    pub current_stage: Option<DaStage>,
    pub compliance_score: Option<u8>,
    pub completion_percent: Option<u8>,
}

impl ProjectPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.compliance_score.is_some() {
            return Err(StoreError::InvalidPatch {
                field: "compliance_score",
                reason: "derived from compliance items",
            });
        }
        if self.completion_percent.is_some() {
            return Err(StoreError::InvalidPatch {
                field: "completion_percent",
                reason: "derived from documents and conditions",
            });
        }
        if self.current_stage.is_some() {
            return Err(StoreError::InvalidPatch {
                field: "current_stage",
                reason: "stages change only by advancing through their gates",
            });
        }
        Ok(())
    }
}

impl Project {
    pub(crate) fn new(id: ProjectId, name: String, address: String, target_days: u32) -> Self {
        Self {
            id,
            name,
            address,
            current_stage: DaStage::PreLodgement,
            days_elapsed: 0,
            target_days,
            compliance_score: 0,
            completion_percent: 100,
            lodgement_reference: None,
            conditions_accepted: false,
            documents: Vec::new(),
            rfis: Vec::new(),
            conditions: Vec::new(),
            compliance_items: Vec::new(),
            stage_history: Vec::new(),
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn current_stage(&self) -> DaStage {
        self.current_stage
    }

    pub fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    pub fn target_days(&self) -> u32 {
        self.target_days
    }

    pub fn compliance_score(&self) -> u8 {
        self.compliance_score
    }

    pub fn completion_percent(&self) -> u8 {
        self.completion_percent
    }

    pub fn lodgement_reference(&self) -> Option<&str> {
        self.lodgement_reference.as_deref()
    }

    pub fn conditions_accepted(&self) -> bool {
        self.conditions_accepted
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn rfis(&self) -> &[Rfi] {
        &self.rfis
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn compliance_items(&self) -> &[ComplianceItem] {
        &self.compliance_items
    }

    pub fn stage_history(&self) -> &[StageTransition] {
        &self.stage_history
    }

    /// Recompute every derived field from the child collections.
    pub(crate) fn refresh(&mut self, policy: &LifecyclePolicy) {
        self.compliance_score = metrics::compliance_score(&self.compliance_items, policy);
        self.completion_percent = metrics::completion_percent(&self.documents, &self.conditions);
    }

    pub(crate) fn apply_patch(&mut self, patch: ProjectPatch) -> Result<(), StoreError> {
        patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(days) = patch.days_elapsed {
            self.days_elapsed = days;
        }
        if let Some(target) = patch.target_days {
            self.target_days = target;
        }
        Ok(())
    }

    pub(crate) fn advance_days(&mut self, days: u32) {
        self.days_elapsed = self.days_elapsed.saturating_add(days);
    }

    /// Returns `false` when a condition with the same id or number is already
    /// tracked; the collection is left untouched in that case.
    pub(crate) fn push_condition(&mut self, condition: Condition) -> bool {
        let exists = self
            .conditions
            .iter()
            .any(|existing| existing.id == condition.id || existing.number == condition.number);
        if exists {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    pub(crate) fn patch_condition(
        &mut self,
        condition_id: &str,
        patch: ConditionPatch,
    ) -> Result<(), StoreError> {
        let condition = self.condition_mut(condition_id)?;

        if let Some(status) = patch.status {
            if status < condition.status {
                return Err(Precondition::StatusRegression {
                    entity: EntityKind::Condition,
                    id: condition.id.clone(),
                    from: condition.status.label(),
                    to: status.label(),
                }
                .into());
            }
            condition.status = status;
        }
        if let Some(responsible) = patch.responsible {
            condition.responsible = responsible;
        }
        if let Some(trigger) = patch.trigger {
            condition.trigger = trigger;
        }
        Ok(())
    }

    pub(crate) fn revert_condition(
        &mut self,
        condition_id: &str,
        status: ConditionStatus,
    ) -> Result<(), StoreError> {
        let condition = self.condition_mut(condition_id)?;
        if status > condition.status {
            return Err(StoreError::InvalidPatch {
                field: "status",
                reason: "a revert can only move a condition backward",
            });
        }
        condition.status = status;
        Ok(())
    }

    pub(crate) fn issue_rfi(&mut self, rfi: NewRfi) -> Result<(), StoreError> {
        if self.rfis.iter().any(|existing| existing.id == rfi.id) {
            return Err(Precondition::Duplicate {
                entity: EntityKind::Rfi,
                id: rfi.id,
            }
            .into());
        }
        self.rfis.push(rfi.into());
        Ok(())
    }

    pub(crate) fn patch_rfi(&mut self, rfi_id: &str, patch: RfiPatch) -> Result<(), StoreError> {
        let rfi = self
            .rfis
            .iter_mut()
            .find(|rfi| rfi.id == rfi_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Rfi, rfi_id))?;

        let status = patch.status.unwrap_or(rfi.status);
        if status < rfi.status {
            return Err(Precondition::StatusRegression {
                entity: EntityKind::Rfi,
                id: rfi.id.clone(),
                from: rfi.status.label(),
                to: status.label(),
            }
            .into());
        }

        let response = match patch.response {
            Some(text) => Some(text.trim().to_string()).filter(|text| !text.is_empty()),
            None => rfi.response.clone(),
        };

        match (status, &response) {
            (RfiStatus::Pending, Some(_)) => {
                return Err(StoreError::InvalidPatch {
                    field: "response",
                    reason: "a response must accompany a status of responded or resolved",
                });
            }
            (RfiStatus::Responded | RfiStatus::Resolved, None) => {
                return Err(Precondition::ResponseRequired {
                    rfi_id: rfi.id.clone(),
                }
                .into());
            }
            _ => {}
        }

        rfi.status = status;
        rfi.response = response;
        if let Some(officer) = patch.officer {
            rfi.officer = officer;
        }
        if let Some(deadline) = patch.deadline {
            rfi.deadline = deadline;
        }
        Ok(())
    }

    pub(crate) fn record_upload(
        &mut self,
        document_id: &str,
        receipt: UploadReceipt,
    ) -> Result<(), StoreError> {
        let document = self
            .documents
            .iter_mut()
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Document, document_id))?;

        let version = document
            .upload
            .as_ref()
            .map_or(1, |previous| previous.version + 1);
        document.upload = Some(DocumentUpload {
            version,
            upload_date: receipt.upload_date,
            size_bytes: receipt.size_bytes,
        });
        Ok(())
    }

    pub(crate) fn record_compliance(
        &mut self,
        items: Vec<ComplianceItem>,
    ) -> Result<(), StoreError> {
        for (index, item) in items.iter().enumerate() {
            let seen_earlier = items[..index].iter().any(|other| other.id == item.id);
            let settled = self.compliance_items.iter().any(|existing| {
                existing.id == item.id && existing.status != ComplianceStatus::Pending
            });
            if seen_earlier || settled {
                return Err(Precondition::Duplicate {
                    entity: EntityKind::ComplianceItem,
                    id: item.id.clone(),
                }
                .into());
            }
        }

        // Pending checks are superseded in place by their result.
        for item in items {
            match self
                .compliance_items
                .iter_mut()
                .find(|existing| existing.id == item.id)
            {
                Some(existing) => *existing = item,
                None => self.compliance_items.push(item),
            }
        }
        Ok(())
    }

    pub(crate) fn record_lodgement(&mut self, reference: &str) -> Result<(), StoreError> {
        require_stage(self, "recording a lodgement", DaStage::Lodgement)?;
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Precondition::EmptyLodgementReference.into());
        }
        self.lodgement_reference = Some(reference.to_string());
        Ok(())
    }

    pub(crate) fn accept_conditions(&mut self) -> Result<(), StoreError> {
        require_stage(self, "accepting conditions", DaStage::Determination)?;
        self.conditions_accepted = true;
        Ok(())
    }

    /// Move into `next`, restarting the statutory clock when assessment begins.
    pub(crate) fn enter_stage(&mut self, next: DaStage, on: NaiveDate) {
        self.stage_history.push(StageTransition {
            from: self.current_stage,
            to: next,
            on,
        });
        self.current_stage = next;
        if next == DaStage::Assessment {
            self.days_elapsed = 0;
        }
    }

    /// Used by fixtures that describe an application already part-way through
    /// its lifecycle.
    pub(crate) fn seed_lifecycle(
        &mut self,
        stage: DaStage,
        days_elapsed: u32,
        lodgement_reference: Option<String>,
        conditions_accepted: bool,
    ) {
        self.current_stage = stage;
        self.days_elapsed = days_elapsed;
        self.lodgement_reference = lodgement_reference;
        self.conditions_accepted = conditions_accepted;
    }

    fn condition_mut(&mut self, condition_id: &str) -> Result<&mut Condition, StoreError> {
        self.conditions
            .iter_mut()
            .find(|condition| condition.id == condition_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Condition, condition_id))
    }
}
