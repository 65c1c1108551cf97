mod parser;

use crate::lifecycle::domain::ComplianceItem;
use crate::lifecycle::project::Project;
use crate::lifecycle::store::{ProjectStore, StoreError};
use std::io::Read;
use std::path::Path;

use parser::ParsedRow;

#[derive(Debug)]
pub enum ComplianceImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownStatus { line: u64, value: String },
    Store(StoreError),
}

impl std::fmt::Display for ComplianceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceImportError::Io(err) => {
                write!(f, "failed to read compliance export: {}", err)
            }
            ComplianceImportError::Csv(err) => write!(f, "invalid compliance CSV data: {}", err),
            ComplianceImportError::UnknownStatus { line, value } => write!(
                f,
                "unrecognized compliance status '{}' on line {}",
                value, line
            ),
            ComplianceImportError::Store(err) => {
                write!(f, "could not record compliance results: {}", err)
            }
        }
    }
}

impl std::error::Error for ComplianceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComplianceImportError::Io(err) => Some(err),
            ComplianceImportError::Csv(err) => Some(err),
            ComplianceImportError::UnknownStatus { .. } => None,
            ComplianceImportError::Store(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ComplianceImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ComplianceImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<StoreError> for ComplianceImportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Reads planning-control check results exported by the compliance-check
/// process. Expected header: `ID,Category,Control,Requirement,Proposal,Status,Notes`.
pub struct ComplianceCsvImporter;

impl ComplianceCsvImporter {
    pub fn read_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ComplianceItem>, ComplianceImportError> {
        let file = std::fs::File::open(path)?;
        Self::read(file)
    }

    pub fn read<R: Read>(reader: R) -> Result<Vec<ComplianceItem>, ComplianceImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .map(|row| match row {
                ParsedRow::Item(item) => Ok(item),
                ParsedRow::UnknownStatus { line, value } => {
                    Err(ComplianceImportError::UnknownStatus { line, value })
                }
            })
            .collect()
    }

    /// Parse the export and record every row against the active project. The
    /// import is all-or-nothing.
    pub fn import_into<'a, R: Read>(
        store: &'a mut ProjectStore,
        reader: R,
    ) -> Result<&'a Project, ComplianceImportError> {
        let items = Self::read(reader)?;
        Ok(store.record_compliance_items(items)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::domain::ComplianceStatus;
    use std::io::Cursor;

    const EXPORT: &str = "ID,Category,Control,Requirement,Proposal,Status,Notes\n\
        lep-height,Built Form,LEP cl 4.3,Max height 9.5m,9.1m,Compliant,\n\
        dcp-setback,Setbacks,DCP 4.1.3,Side setback 1.5m,1.2m,Variation Sought,Clause 4.6 request\n\
        dcp-parking,Access,DCP 5.2,Two spaces,One space,non_compliant,\n\
        basix,Sustainability,BASIX,Certificate,,Pending,\n";

    #[test]
    fn read_maps_status_spellings() {
        let items = ComplianceCsvImporter::read(Cursor::new(EXPORT)).expect("export parses");

        let statuses: Vec<ComplianceStatus> = items.iter().map(|item| item.status).collect();
        assert_eq!(
            statuses,
            vec![
                ComplianceStatus::Compliant,
                ComplianceStatus::Variation,
                ComplianceStatus::NonCompliant,
                ComplianceStatus::Pending,
            ]
        );
        assert_eq!(items[0].notes, None);
        assert_eq!(items[1].notes.as_deref(), Some("Clause 4.6 request"));
    }

    #[test]
    fn read_rejects_unknown_status_with_line_number() {
        let export = "ID,Category,Control,Requirement,Proposal,Status,Notes\n\
            a,Built Form,LEP cl 4.3,Max height,9m,Compliant,\n\
            b,Built Form,LEP cl 4.4,Max FSR,0.6:1,Maybe,\n";

        match ComplianceCsvImporter::read(Cursor::new(export)) {
            Err(ComplianceImportError::UnknownStatus { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "Maybe");
            }
            other => panic!("expected unknown status error, got {other:?}"),
        }
    }

    #[test]
    fn import_into_updates_compliance_score() {
        let mut store = ProjectStore::default();
        store.create_project("1 Smith St", "New Build");

        let project = ComplianceCsvImporter::import_into(&mut store, Cursor::new(EXPORT))
            .expect("import succeeds");

        assert_eq!(project.compliance_items().len(), 4);
        assert_eq!(project.compliance_score(), 38);
    }

    #[test]
    fn import_into_is_all_or_nothing() {
        let mut store = ProjectStore::default();
        store.create_project("1 Smith St", "New Build");
        ComplianceCsvImporter::import_into(&mut store, Cursor::new(EXPORT))
            .expect("first import succeeds");

        let err = ComplianceCsvImporter::import_into(&mut store, Cursor::new(EXPORT))
            .expect_err("re-importing the same ids is rejected");

        assert!(matches!(
            err,
            ComplianceImportError::Store(StoreError::PreconditionFailed(_))
        ));
        let project = store.active().expect("project still active");
        assert_eq!(project.compliance_items().len(), 4);
    }
}
