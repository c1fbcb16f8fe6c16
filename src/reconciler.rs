use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;

use crate::ledger::Ledger;
use crate::mappings::MappingStore;
use crate::models::{month_label, month_key, CandidateTransaction, ContributionRecord, PURPOSE_INTRO_COURSE};

/// First blocking validation failure for a batch, with the offending rows.
/// Row numbers are 1-based positions within the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("rows missing a {}: {}", .field, format_rows(.rows))]
    MissingField { field: &'static str, rows: Vec<usize> },

    #[error("same member credited twice for one period: {}", format_groups(.groups))]
    DuplicateInBatch { groups: Vec<DuplicateGroup> },

    #[error("already recorded in ledger: {}", format_conflicts(.conflicts))]
    AlreadyRecorded { conflicts: Vec<Conflict> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub member: String,
    pub month: u32,
    pub purpose: String,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub member: String,
    pub year: i32,
    pub month: u32,
    pub row: usize,
}

fn format_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_groups(groups: &[DuplicateGroup]) -> String {
    groups
        .iter()
        .map(|g| format!("{} / {} / {} (rows {})", g.member, month_label(g.month), g.purpose, format_rows(&g.rows)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("{} / {} {} (row {})", c.member, month_label(c.month), c.year, c.row))
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a reviewed batch against itself and the ledger.
///
/// Checks run in a fixed order and the first failing category is returned,
/// not an aggregate: the operator fixes and re-runs. Order: completeness,
/// batch-internal duplication, ledger conflict. The conflict year is each
/// transaction's own date year.
pub fn validate(batch: &[CandidateTransaction], ledger: &Ledger) -> Result<(), ValidationError> {
    for (field, missing) in [
        ("purpose", rows_where(batch, |tx| tx.purpose.trim().is_empty())),
        ("member", rows_where(batch, |tx| tx.member.as_deref().unwrap_or("").trim().is_empty())),
        ("month", rows_where(batch, |tx| tx.month.is_none())),
    ] {
        if !missing.is_empty() {
            return Err(ValidationError::MissingField { field, rows: missing });
        }
    }

    let mut groups: BTreeMap<(String, u32, String), Vec<usize>> = BTreeMap::new();
    for (row, tx) in numbered(batch) {
        let key = (
            tx.member.clone().unwrap_or_default(),
            tx.month.unwrap_or_default(),
            tx.purpose.clone(),
        );
        groups.entry(key).or_default().push(row);
    }
    let duplicates: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|((member, month, purpose), rows)| DuplicateGroup { member, month, purpose, rows })
        .collect();
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateInBatch { groups: duplicates });
    }

    let mut conflicts = Vec::new();
    for (row, tx) in numbered(batch) {
        let name = tx.member.as_deref().unwrap_or_default();
        let month = tx.month.unwrap_or_default();
        // Unknown names surface at commit time as warnings, not here.
        if let Some(id) = ledger.find_member_id(name) {
            if ledger.has_record(&id, tx.year(), month) {
                conflicts.push(Conflict {
                    member: name.to_string(),
                    year: tx.year(),
                    month,
                    row,
                });
            }
        }
    }
    if !conflicts.is_empty() {
        return Err(ValidationError::AlreadyRecorded { conflicts });
    }

    Ok(())
}

fn numbered(batch: &[CandidateTransaction]) -> impl Iterator<Item = (usize, &CandidateTransaction)> {
    batch.iter().enumerate().map(|(i, tx)| (i + 1, tx))
}

fn rows_where(batch: &[CandidateTransaction], pred: impl Fn(&CandidateTransaction) -> bool) -> Vec<usize> {
    numbered(batch).filter(|(_, tx)| pred(tx)).map(|(row, _)| row).collect()
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CommitOutcome {
    /// Contribution records written.
    pub recorded: usize,
    /// Member names that could not be resolved; their rows were skipped.
    pub skipped: Vec<String>,
    /// New details → member mappings learned.
    pub learned: usize,
}

/// Merge a validated batch into the ledger and mapping store.
///
/// Mutates both stores in memory only; the caller persists them after the
/// whole batch. Partial-failure tolerant: a row whose member name no longer
/// resolves is skipped with a warning and the rest of the batch proceeds.
/// Re-running an interrupted commit is safe because record writes are
/// idempotent and validation rejects already-recorded periods.
pub fn commit(
    batch: &[CandidateTransaction],
    ledger: &mut Ledger,
    mappings: &mut MappingStore,
) -> crate::error::Result<CommitOutcome> {
    validate(batch, ledger)?;

    let mut outcome = CommitOutcome::default();

    for tx in batch {
        let name = tx.member.as_deref().unwrap_or_default().trim();
        let Some(member_id) = ledger.find_member_id(name) else {
            // Should not happen after validation; data integrity issue.
            if !outcome.skipped.iter().any(|n| n == name) {
                outcome.skipped.push(name.to_string());
            }
            continue;
        };

        let year = tx.year();
        let month = tx.month.unwrap_or_default();
        let transaction_id = effective_transaction_id(tx, &member_id, year, month);

        ledger.insert_record(
            &member_id,
            year,
            month,
            ContributionRecord {
                amount: tx.amount,
                date: Some(tx.date.format("%Y-%m-%d").to_string()),
                transaction_id: Some(transaction_id),
                source: "statement-import".to_string(),
                purpose: tx.purpose.clone(),
                details: tx.details.trim().to_string(),
                month_label: month_label(month).to_string(),
            },
        )?;
        outcome.recorded += 1;

        if tx.purpose == PURPOSE_INTRO_COURSE {
            ledger.mark_intro_course(&member_id)?;
        }

        if mappings.learn(&tx.details, name) {
            outcome.learned += 1;
        }
    }

    Ok(outcome)
}

/// The bank reference when present, otherwise a synthesized id so the record
/// always carries a non-empty identifier.
fn effective_transaction_id(tx: &CandidateTransaction, member_id: &str, year: i32, month: u32) -> String {
    let reference = tx.reference.trim();
    if !reference.is_empty() {
        return reference.to_string();
    }
    format!("import-{member_id}-{year}{}-{}", month_key(month), Utc::now().timestamp())
}
