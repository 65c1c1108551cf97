use super::domain::Document;

#[derive(Debug, Clone)]
pub struct ChecklistEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub required: bool,
}

/// Template of documents an applicant assembles before lodgement.
#[derive(Debug)]
pub struct DocumentChecklist {
    entries: Vec<ChecklistEntry>,
}

impl DocumentChecklist {
    pub fn standard() -> Self {
        Self {
            entries: standard_entries(),
        }
    }

    pub fn entries(&self) -> &[ChecklistEntry] {
        &self.entries
    }

    pub fn entries_for_category(&self, category: &str) -> Vec<&ChecklistEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Materialize the checklist as not-yet-uploaded documents.
    pub fn documents(&self) -> Vec<Document> {
        self.entries
            .iter()
            .map(|entry| Document::new(entry.key, entry.name, entry.category, entry.required))
            .collect()
    }
}

fn standard_entries() -> Vec<ChecklistEntry> {
    vec![
        ChecklistEntry {
            key: "site_plan",
            name: "Site Plan",
            category: "Plans",
            required: true,
        },
        ChecklistEntry {
            key: "floor_plans",
            name: "Floor Plans",
            category: "Plans",
            required: true,
        },
        ChecklistEntry {
            key: "elevations_sections",
            name: "Elevations and Sections",
            category: "Plans",
            required: true,
        },
        ChecklistEntry {
            key: "survey_plan",
            name: "Survey Plan",
            category: "Plans",
            required: true,
        },
        ChecklistEntry {
            key: "statement_environmental_effects",
            name: "Statement of Environmental Effects",
            category: "Reports",
            required: true,
        },
        ChecklistEntry {
            key: "basix_certificate",
            name: "BASIX Certificate",
            category: "Certificates",
            required: true,
        },
        ChecklistEntry {
            key: "stormwater_concept",
            name: "Stormwater Concept Plan",
            category: "Engineering",
            required: true,
        },
        ChecklistEntry {
            key: "landscape_plan",
            name: "Landscape Plan",
            category: "Plans",
            required: false,
        },
        ChecklistEntry {
            key: "shadow_diagrams",
            name: "Shadow Diagrams",
            category: "Plans",
            required: false,
        },
        ChecklistEntry {
            key: "arborist_report",
            name: "Arborist Report",
            category: "Reports",
            required: false,
        },
        ChecklistEntry {
            key: "owners_consent",
            name: "Owner's Consent",
            category: "Administrative",
            required: true,
        },
        ChecklistEntry {
            key: "cost_estimate",
            name: "Cost of Works Estimate",
            category: "Administrative",
            required: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_checklist_materializes_unuploaded_documents() {
        let checklist = DocumentChecklist::standard();
        let documents = checklist.documents();

        assert_eq!(documents.len(), checklist.entries().len());
        assert!(documents.iter().all(|doc| !doc.is_uploaded()));
        assert!(documents
            .iter()
            .any(|doc| doc.id == "basix_certificate" && doc.required));
        assert_eq!(checklist.entries_for_category("Administrative").len(), 2);
    }
}
