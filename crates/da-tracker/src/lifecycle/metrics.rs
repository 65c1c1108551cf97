//! Pure aggregations over a project's child collections.
//!
//! Every function here rounds half-up to a whole percentage. Nothing in this
//! module is stored independently: `Project` recomputes its derived fields
//! from these functions after every mutation.

use super::domain::{ComplianceItem, ComplianceStatus, Condition, Document, TimelineRisk};
use super::policy::LifecyclePolicy;

/// Weighted share of passing compliance checks.
///
/// `variation` items earn the policy's partial credit; `pending` and
/// `non-compliant` items earn none. A project with no checks scores 0.
pub fn compliance_score(items: &[ComplianceItem], policy: &LifecyclePolicy) -> u8 {
    if items.is_empty() {
        return 0;
    }

    let earned: u64 = items
        .iter()
        .map(|item| match item.status {
            ComplianceStatus::Compliant => 100,
            ComplianceStatus::Variation => u64::from(policy.variation_weight_pct()),
            ComplianceStatus::NonCompliant | ComplianceStatus::Pending => 0,
        })
        .sum();

    rounded_ratio(earned, items.len() as u64 * 100)
}

/// Share of required documents uploaded plus consent conditions completed.
///
/// Returns 100 when there is nothing to complete.
pub fn completion_percent(documents: &[Document], conditions: &[Condition]) -> u8 {
    let required = documents.iter().filter(|doc| doc.required).count();
    let uploaded = documents
        .iter()
        .filter(|doc| doc.required && doc.is_uploaded())
        .count();
    let done = conditions
        .iter()
        .filter(|condition| condition.status.is_done())
        .count();

    percent_or_full(
        (uploaded + done) as u64,
        (required + conditions.len()) as u64,
    )
}

/// Classify the statutory clock: under half elapsed is on track, up to and
/// including 80% is worth monitoring, beyond that the determination is at risk.
pub fn timeline_risk(days_elapsed: u32, target_days: u32) -> TimelineRisk {
    if target_days == 0 {
        return TimelineRisk::AtRisk;
    }

    let elapsed = u64::from(days_elapsed) * 100;
    let target = u64::from(target_days);

    if elapsed < target * 50 {
        TimelineRisk::OnTrack
    } else if elapsed <= target * 80 {
        TimelineRisk::Monitor
    } else {
        TimelineRisk::AtRisk
    }
}

/// Completion of the conditions belonging to one category. An empty category
/// reports 100.
pub fn category_progress(conditions: &[Condition], category: &str) -> u8 {
    let (done, total) = conditions
        .iter()
        .filter(|condition| condition.category == category)
        .fold((0u64, 0u64), |(done, total), condition| {
            (done + u64::from(condition.status.is_done()), total + 1)
        });

    percent_or_full(done, total)
}

fn percent_or_full(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 100;
    }
    rounded_ratio(numerator * 100, denominator * 100)
}

/// `round(100 * numerator / denominator)` with half-up rounding, capped at 100.
fn rounded_ratio(numerator: u64, denominator: u64) -> u8 {
    let pct = (numerator * 200 + denominator) / (denominator * 2);
    pct.min(100) as u8
}
