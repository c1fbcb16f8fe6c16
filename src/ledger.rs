use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DuesError, Result};
use crate::models::{month_key, ContributionRecord, MembershipClass};
use crate::store;

pub const LEDGER_FILE: &str = "ledger.json";

/// Contribution records for one member: year key ("2025") → month key
/// ("01".."12") → record. At most one record per slot.
pub type Contributions = BTreeMap<String, BTreeMap<String, ContributionRecord>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub class: MembershipClass,
    #[serde(default)]
    pub intro_course: bool,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contributions: Contributions,
}

impl Member {
    pub fn record(&self, year: i32, month: u32) -> Option<&ContributionRecord> {
        self.contributions
            .get(&year.to_string())
            .and_then(|months| months.get(&month_key(month)))
    }

    pub fn has_paid(&self, year: i32, month: u32) -> bool {
        self.record(year, month).is_some()
    }
}

/// Source of truth for members and their recorded contributions.
///
/// Loaded wholesale, mutated in memory, saved wholesale; callers own the
/// load → mutate → save cycle. Ordered maps keep serialization
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub members: BTreeMap<String, Member>,
}

impl Ledger {
    pub fn load(path: &Path) -> Result<Self> {
        store::load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        store::save_json(path, self)
    }

    /// Exact-name lookup in the member directory.
    pub fn find_member_id(&self, name: &str) -> Option<String> {
        self.members
            .iter()
            .find(|(_, m)| m.name == name)
            .map(|(id, _)| id.clone())
    }

    fn next_member_id(&self) -> String {
        let max = self
            .members
            .keys()
            .filter_map(|id| id.strip_prefix('M'))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("M{:03}", max + 1)
    }

    /// Add a member and return the allocated id. Names must be unique:
    /// reconciliation resolves members by exact name.
    pub fn add_member(
        &mut self,
        name: &str,
        class: MembershipClass,
        phone: &str,
        email: &str,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DuesError::Other("member name must not be empty".into()));
        }
        if self.find_member_id(name).is_some() {
            return Err(DuesError::DuplicateMember(name.to_string()));
        }
        let id = self.next_member_id();
        self.members.insert(
            id.clone(),
            Member {
                name: name.to_string(),
                class,
                intro_course: false,
                phone: phone.trim().to_string(),
                email: email.trim().to_string(),
                contributions: Contributions::new(),
            },
        );
        Ok(id)
    }

    pub fn has_record(&self, member_id: &str, year: i32, month: u32) -> bool {
        self.members
            .get(member_id)
            .map(|m| m.has_paid(year, month))
            .unwrap_or(false)
    }

    /// Write a record into its (member, year, month) slot. Overwrites are the
    /// caller's responsibility to rule out beforehand; validation blocks
    /// statement imports from reaching an occupied slot.
    pub fn insert_record(
        &mut self,
        member_id: &str,
        year: i32,
        month: u32,
        record: ContributionRecord,
    ) -> Result<()> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| DuesError::UnknownMember(member_id.to_string()))?;
        member
            .contributions
            .entry(year.to_string())
            .or_default()
            .insert(month_key(month), record);
        Ok(())
    }

    /// Idempotent: setting the flag twice is harmless.
    pub fn mark_intro_course(&mut self, member_id: &str) -> Result<()> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| DuesError::UnknownMember(member_id.to_string()))?;
        member.intro_course = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{month_label, PURPOSE_MEMBERSHIP};

    fn record(amount: f64, month: u32) -> ContributionRecord {
        ContributionRecord {
            amount,
            date: Some("2025-03-10".to_string()),
            transaction_id: Some("SL250310A".to_string()),
            source: "statement-import".to_string(),
            purpose: PURPOSE_MEMBERSHIP.to_string(),
            details: "Jane Doe, Zurich".to_string(),
            month_label: month_label(month).to_string(),
        }
    }

    #[test]
    fn test_member_id_allocation() {
        let mut ledger = Ledger::default();
        assert_eq!(
            ledger.add_member("Jane Doe", MembershipClass::Active, "", "").unwrap(),
            "M001"
        );
        assert_eq!(
            ledger.add_member("John Roe", MembershipClass::Passive, "", "").unwrap(),
            "M002"
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut ledger = Ledger::default();
        ledger.add_member("Jane Doe", MembershipClass::Active, "", "").unwrap();
        let err = ledger
            .add_member("Jane Doe", MembershipClass::Passive, "", "")
            .unwrap_err();
        assert!(matches!(err, DuesError::DuplicateMember(_)));
    }

    #[test]
    fn test_insert_and_query_record() {
        let mut ledger = Ledger::default();
        let id = ledger.add_member("Jane Doe", MembershipClass::Active, "", "").unwrap();
        assert!(!ledger.has_record(&id, 2025, 3));

        ledger.insert_record(&id, 2025, 3, record(50.0, 3)).unwrap();
        assert!(ledger.has_record(&id, 2025, 3));
        assert!(!ledger.has_record(&id, 2025, 4));
        assert!(!ledger.has_record(&id, 2024, 3));

        let rec = ledger.members[&id].record(2025, 3).unwrap();
        assert_eq!(rec.amount, 50.0);
        assert_eq!(rec.month_label, "March");
    }

    #[test]
    fn test_insert_record_unknown_member() {
        let mut ledger = Ledger::default();
        let err = ledger.insert_record("M999", 2025, 3, record(50.0, 3)).unwrap_err();
        assert!(matches!(err, DuesError::UnknownMember(_)));
    }

    #[test]
    fn test_mark_intro_course_idempotent() {
        let mut ledger = Ledger::default();
        let id = ledger.add_member("Jane Doe", MembershipClass::Active, "", "").unwrap();
        ledger.mark_intro_course(&id).unwrap();
        ledger.mark_intro_course(&id).unwrap();
        assert!(ledger.members[&id].intro_course);
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEDGER_FILE);

        let empty = Ledger::load(&path).unwrap();
        assert!(empty.members.is_empty());
        empty.save(&path).unwrap();
        assert_eq!(Ledger::load(&path).unwrap(), empty);

        let mut ledger = Ledger::default();
        let jane = ledger
            .add_member("Jane Doe", MembershipClass::Active, "+41 79 000 00 00", "jane@example.com")
            .unwrap();
        let john = ledger.add_member("John Roe", MembershipClass::Passive, "", "").unwrap();
        ledger.insert_record(&jane, 2025, 3, record(50.0, 3)).unwrap();
        ledger.insert_record(&john, 2025, 1, record(25.0, 1)).unwrap();
        ledger.mark_intro_course(&jane).unwrap();

        ledger.save(&path).unwrap();
        assert_eq!(Ledger::load(&path).unwrap(), ledger);
    }
}
