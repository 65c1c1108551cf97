use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use super::domain::{ComplianceStatus, DaStage, ProjectId, RfiStatus, TimelineRisk};
use super::metrics;
use super::policy::LifecyclePolicy;
use super::progression;
use super::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Complete,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageProgressEntry {
    pub stage: DaStage,
    pub stage_label: &'static str,
    pub state: StageState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entered_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RfiSnapshotView {
    pub id: String,
    pub requirement: String,
    pub officer: String,
    pub deadline: NaiveDate,
    pub status: RfiStatus,
    pub status_label: &'static str,
    pub overdue: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgressEntry {
    pub category: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceGapView {
    pub id: String,
    pub category: String,
    pub control: String,
    pub requirement: String,
    pub proposal: String,
    pub status: ComplianceStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Read model combining a project's derived metrics with the lists a
/// dashboard needs to highlight.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDashboard {
    pub project_id: ProjectId,
    pub name: String,
    pub address: String,
    pub today: NaiveDate,
    pub current_stage: DaStage,
    pub current_stage_label: &'static str,
    pub stages: Vec<StageProgressEntry>,
    pub compliance_score: u8,
    pub completion_percent: u8,
    pub days_elapsed: u32,
    pub target_days: u32,
    pub timeline_risk: TimelineRisk,
    pub timeline_risk_label: &'static str,
    pub documents_uploaded: usize,
    pub documents_required: usize,
    pub outstanding_rfis: Vec<RfiSnapshotView>,
    pub overdue_rfis: usize,
    pub condition_progress: Vec<CategoryProgressEntry>,
    pub compliance_gaps: Vec<ComplianceGapView>,
    /// Why the project cannot advance yet; `None` when the gate is open or the
    /// project is already in post-consent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_gate_blocker: Option<String>,
}

impl ProjectDashboard {
    pub fn build(project: &Project, policy: &LifecyclePolicy, today: NaiveDate) -> Self {
        let current = project.current_stage();
        let stages = DaStage::ordered()
            .into_iter()
            .map(|stage| {
                let state = if stage < current {
                    StageState::Complete
                } else if stage == current {
                    StageState::Current
                } else {
                    StageState::Upcoming
                };
                let entered_on = project
                    .stage_history()
                    .iter()
                    .rev()
                    .find(|transition| transition.to == stage)
                    .map(|transition| transition.on);
                StageProgressEntry {
                    stage,
                    stage_label: stage.label(),
                    state,
                    entered_on,
                }
            })
            .collect();

        let mut outstanding_rfis: Vec<RfiSnapshotView> = project
            .rfis()
            .iter()
            .filter(|rfi| rfi.status != RfiStatus::Resolved)
            .map(|rfi| RfiSnapshotView {
                id: rfi.id.clone(),
                requirement: rfi.requirement.clone(),
                officer: rfi.officer.clone(),
                deadline: rfi.deadline,
                status: rfi.status,
                status_label: rfi.status.label(),
                overdue: rfi.is_overdue(today),
            })
            .collect();
        outstanding_rfis.sort_by(|a, b| a.deadline.cmp(&b.deadline));
        let overdue_rfis = outstanding_rfis.iter().filter(|rfi| rfi.overdue).count();

        let categories: BTreeSet<&str> = project
            .conditions()
            .iter()
            .map(|condition| condition.category.as_str())
            .collect();
        let condition_progress = categories
            .into_iter()
            .map(|category| {
                let in_category = project
                    .conditions()
                    .iter()
                    .filter(|condition| condition.category == category);
                let total = in_category.clone().count();
                let completed = in_category
                    .filter(|condition| condition.status.is_done())
                    .count();
                CategoryProgressEntry {
                    category: category.to_string(),
                    completed,
                    total,
                    percent: metrics::category_progress(project.conditions(), category),
                }
            })
            .collect();

        let compliance_gaps = project
            .compliance_items()
            .iter()
            .filter(|item| item.status != ComplianceStatus::Compliant)
            .map(|item| ComplianceGapView {
                id: item.id.clone(),
                category: item.category.clone(),
                control: item.control.clone(),
                requirement: item.requirement.clone(),
                proposal: item.proposal.clone(),
                status: item.status,
                status_label: item.status.label(),
                notes: item.notes.clone(),
            })
            .collect();

        let next_gate_blocker = match progression::check_advance(project, policy) {
            Ok(_) | Err(progression::Precondition::FinalStage) => None,
            Err(blocker) => Some(blocker.to_string()),
        };

        let timeline_risk = metrics::timeline_risk(project.days_elapsed(), project.target_days());

        Self {
            project_id: project.id().clone(),
            name: project.name().to_string(),
            address: project.address().to_string(),
            today,
            current_stage: current,
            current_stage_label: current.label(),
            stages,
            compliance_score: project.compliance_score(),
            completion_percent: project.completion_percent(),
            days_elapsed: project.days_elapsed(),
            target_days: project.target_days(),
            timeline_risk,
            timeline_risk_label: timeline_risk.label(),
            documents_uploaded: project
                .documents()
                .iter()
                .filter(|doc| doc.required && doc.is_uploaded())
                .count(),
            documents_required: project.documents().iter().filter(|doc| doc.required).count(),
            outstanding_rfis,
            overdue_rfis,
            condition_progress,
            compliance_gaps,
            next_gate_blocker,
        }
    }
}
