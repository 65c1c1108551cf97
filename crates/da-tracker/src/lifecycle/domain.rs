use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for tracked development applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phases of a development application, in statutory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DaStage {
    PreLodgement,
    Lodgement,
    Assessment,
    Determination,
    PostConsent,
}

impl DaStage {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::PreLodgement,
            Self::Lodgement,
            Self::Assessment,
            Self::Determination,
            Self::PostConsent,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreLodgement => "Pre-Lodgement",
            Self::Lodgement => "Lodgement",
            Self::Assessment => "Assessment",
            Self::Determination => "Determination",
            Self::PostConsent => "Post-Consent",
        }
    }

    /// The stage that follows this one, or `None` once consent has been issued.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PreLodgement => Some(Self::Lodgement),
            Self::Lodgement => Some(Self::Assessment),
            Self::Assessment => Some(Self::Determination),
            Self::Determination => Some(Self::PostConsent),
            Self::PostConsent => None,
        }
    }
}

/// Response lifecycle of a council request for information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RfiStatus {
    Pending,
    Responded,
    Resolved,
}

impl RfiStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Responded => "Responded",
            Self::Resolved => "Resolved",
        }
    }
}

/// Progress of a single consent condition. Declaration order is the only
/// permitted direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionStatus {
    NotStarted,
    InProgress,
    Completed,
    Verified,
}

impl ConditionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Verified => "Verified",
        }
    }

    pub const fn is_done(self) -> bool {
        matches!(self, Self::Completed | Self::Verified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Variation,
    Pending,
}

impl ComplianceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::NonCompliant => "Non-Compliant",
            Self::Variation => "Variation Sought",
            Self::Pending => "Pending",
        }
    }
}

/// Metadata written back once the external document store finishes a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub version: u32,
    pub upload_date: NaiveDate,
    pub size_bytes: u64,
}

/// A checklist entry for the application bundle. Upload metadata only exists
/// once the document has been uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub category: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<DocumentUpload>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            required,
            upload: None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.upload.is_some()
    }
}

/// Receipt handed over by the document store after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub upload_date: NaiveDate,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rfi {
    pub id: String,
    pub requirement: String,
    pub category: String,
    pub officer: String,
    pub date: NaiveDate,
    pub deadline: NaiveDate,
    pub status: RfiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl Rfi {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == RfiStatus::Pending && self.deadline < today
    }
}

/// Request raised by the assessing officer; always enters the project as pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRfi {
    pub id: String,
    pub requirement: String,
    pub category: String,
    pub officer: String,
    pub date: NaiveDate,
    pub deadline: NaiveDate,
}

impl From<NewRfi> for Rfi {
    fn from(value: NewRfi) -> Self {
        Self {
            id: value.id,
            requirement: value.requirement,
            category: value.category,
            officer: value.officer,
            date: value.date,
            deadline: value.deadline,
            status: RfiStatus::Pending,
            response: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfiPatch {
    pub status: Option<RfiStatus>,
    pub response: Option<String>,
    pub officer: Option<String>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    pub number: u32,
    pub category: String,
    pub requirement: String,
    pub trigger: String,
    pub responsible: String,
    pub status: ConditionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionPatch {
    pub status: Option<ConditionStatus>,
    pub responsible: Option<String>,
    pub trigger: Option<String>,
}

/// Outcome of a planning-control check, produced outside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceItem {
    pub id: String,
    pub category: String,
    pub control: String,
    pub requirement: String,
    pub proposal: String,
    pub status: ComplianceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: DaStage,
    pub to: DaStage,
    pub on: NaiveDate,
}

/// Child collections addressed by store operations, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Document,
    Rfi,
    Condition,
    ComplianceItem,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Document => "document",
            Self::Rfi => "RFI",
            Self::Condition => "condition",
            Self::ComplianceItem => "compliance item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineRisk {
    OnTrack,
    Monitor,
    AtRisk,
}

impl TimelineRisk {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::Monitor => "Monitor",
            Self::AtRisk => "At Risk",
        }
    }
}
