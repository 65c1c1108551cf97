use crate::lifecycle::domain::{ComplianceItem, ComplianceStatus};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) enum ParsedRow {
    Item(ComplianceItem),
    UnknownStatus { line: u64, value: String },
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ParsedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: ComplianceRow = record.deserialize(Some(&headers))?;
        rows.push(row.into_parsed(line));
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ComplianceRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Control")]
    control: String,
    #[serde(rename = "Requirement")]
    requirement: String,
    #[serde(rename = "Proposal", default)]
    proposal: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl ComplianceRow {
    fn into_parsed(self, line: u64) -> ParsedRow {
        match parse_status(&self.status) {
            Some(status) => ParsedRow::Item(ComplianceItem {
                id: self.id,
                category: self.category,
                control: self.control,
                requirement: self.requirement,
                proposal: self.proposal,
                status,
                notes: self.notes,
            }),
            None => ParsedRow::UnknownStatus {
                line,
                value: self.status,
            },
        }
    }
}

/// Accepts the spellings compliance-check tools commonly export.
pub(crate) fn parse_status(raw: &str) -> Option<ComplianceStatus> {
    let normalized: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect();

    match normalized.as_str() {
        "compliant" | "complies" | "yes" => Some(ComplianceStatus::Compliant),
        "non-compliant" | "noncompliant" | "no" => Some(ComplianceStatus::NonCompliant),
        "variation" | "variation-sought" => Some(ComplianceStatus::Variation),
        "pending" | "" => Some(ComplianceStatus::Pending),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
