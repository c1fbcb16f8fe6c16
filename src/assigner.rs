use chrono::Datelike;

use crate::mappings::MappingStore;
use crate::models::CandidateTransaction;

/// A credit early in the month is usually a late payment for the prior
/// period, so no month default is guessed for it.
const MONTH_DEFAULT_CUTOFF_DAY: u32 = 7;

/// Fill member and month defaults on a candidate batch.
///
/// Pure transform: nothing is persisted and already-assigned fields are left
/// alone. Ambiguity is resolved by leaving a field blank for the operator,
/// never by guessing between alternatives.
pub fn assign(candidates: &mut [CandidateTransaction], mappings: &MappingStore) {
    for tx in candidates.iter_mut() {
        if tx.month.is_none() && tx.date.day() > MONTH_DEFAULT_CUTOFF_DAY {
            tx.month = Some(tx.date.month());
        }
        if tx.member.is_none() {
            if let Some(member) = mappings.lookup(&tx.details) {
                tx.member = Some(member.to_string());
            }
        }
    }
}
