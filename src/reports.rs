use std::path::Path;

use crate::error::Result;
use crate::fmt::chf;
use crate::ledger::{Ledger, Member};
use crate::models::{month_label, MembershipClass};

// ---------------------------------------------------------------------------
// Outstanding payments
// ---------------------------------------------------------------------------

/// One member's unpaid periods up to a cut-off month.
#[derive(Debug, Clone, PartialEq)]
pub struct OutstandingEntry {
    pub member_id: String,
    pub name: String,
    pub class: MembershipClass,
    pub phone: String,
    pub email: String,
    /// Unpaid months, 1-based, ascending.
    pub months: Vec<u32>,
    pub monthly_amount: f64,
    pub total: f64,
}

impl OutstandingEntry {
    pub fn month_names(&self) -> Vec<&'static str> {
        self.months.iter().map(|m| month_label(*m)).collect()
    }
}

fn unpaid_months(member: &Member, year: i32, up_to_month: u32) -> Vec<u32> {
    (1..=up_to_month.min(12))
        .filter(|m| !member.has_paid(year, *m))
        .collect()
}

/// Members of a contributing class with unpaid periods in `year`, considering
/// months 1..=`up_to_month`. Inactive members owe nothing and are skipped,
/// as are members with every period paid.
pub fn outstanding(ledger: &Ledger, year: i32, up_to_month: u32) -> Vec<OutstandingEntry> {
    let mut entries = Vec::new();
    for (id, member) in &ledger.members {
        let monthly_amount = member.class.monthly_amount();
        if monthly_amount == 0.0 {
            continue;
        }
        let months = unpaid_months(member, year, up_to_month);
        if months.is_empty() {
            continue;
        }
        let total = monthly_amount * months.len() as f64;
        entries.push(OutstandingEntry {
            member_id: id.clone(),
            name: member.name.clone(),
            class: member.class,
            phone: member.phone.clone(),
            email: member.email.clone(),
            months,
            monthly_amount,
            total,
        });
    }
    entries
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutstandingSummary {
    /// Active and passive members considered.
    pub total_members: usize,
    pub members_with_outstanding: usize,
    pub total_outstanding: f64,
}

pub fn summary(ledger: &Ledger, year: i32, up_to_month: u32) -> OutstandingSummary {
    let total_members = ledger
        .members
        .values()
        .filter(|m| m.class != MembershipClass::Inactive)
        .count();
    let entries = outstanding(ledger, year, up_to_month);
    OutstandingSummary {
        total_members,
        members_with_outstanding: entries.len(),
        total_outstanding: entries.iter().map(|e| e.total).sum(),
    }
}

/// Paid/unpaid member counts per month of a year, across all members.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOverview {
    pub month: u32,
    pub paid: usize,
    pub unpaid: usize,
}

pub fn month_overview(ledger: &Ledger, year: i32) -> Vec<MonthOverview> {
    let total = ledger.members.len();
    (1..=12)
        .map(|month| {
            let paid = ledger.members.values().filter(|m| m.has_paid(year, month)).count();
            MonthOverview { month, paid, unpaid: total - paid }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reminder export
// ---------------------------------------------------------------------------

pub fn reminder_message(entry: &OutstandingEntry, year: i32) -> String {
    let mut msg = String::new();
    msg.push_str(&format!("Payment reminder\n\nHello {},\n\n", entry.name));
    msg.push_str(&format!("Contributions for {year} are still open for:\n"));
    for name in entry.month_names() {
        msg.push_str(&format!("- {name}\n"));
    }
    msg.push_str(&format!(
        "\nMembership class: {}\nMonthly contribution: {}\nTotal outstanding: {}\n\n",
        entry.class.label(),
        chf(entry.monthly_amount),
        chf(entry.total),
    ));
    msg.push_str("Please transfer the amount to the club account. Thank you!");
    msg
}

/// Write a reminder CSV for every member with outstanding payments. Returns
/// the number of exported rows. The file is consumed by whatever channel the
/// club uses to nudge members; this side only produces it.
pub fn export_reminders(
    path: &Path,
    ledger: &Ledger,
    year: i32,
    up_to_month: u32,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "member",
        "phone",
        "email",
        "class",
        "outstanding_months",
        "monthly_amount",
        "total_chf",
        "message",
    ])?;

    let entries = outstanding(ledger, year, up_to_month);
    for entry in &entries {
        writer.write_record([
            entry.name.clone(),
            entry.phone.clone(),
            entry.email.clone(),
            entry.class.label().to_string(),
            entry.month_names().join(", "),
            format!("{:.2}", entry.monthly_amount),
            format!("{:.2}", entry.total),
            reminder_message(entry, year).replace('\n', " | "),
        ])?;
    }
    writer.flush()?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContributionRecord, PURPOSE_MEMBERSHIP};

    fn record(month: u32) -> ContributionRecord {
        ContributionRecord {
            amount: 50.0,
            date: None,
            transaction_id: None,
            source: "manual".to_string(),
            purpose: PURPOSE_MEMBERSHIP.to_string(),
            details: String::new(),
            month_label: month_label(month).to_string(),
        }
    }

    fn ledger() -> Ledger {
        let mut ledger = Ledger::default();
        ledger.add_member("Jane Doe", MembershipClass::Active, "+41 79 000 00 00", "jane@example.com").unwrap();
        ledger.add_member("John Roe", MembershipClass::Passive, "", "").unwrap();
        ledger.add_member("Max Idle", MembershipClass::Inactive, "", "").unwrap();
        ledger
    }

    #[test]
    fn test_outstanding_with_no_records() {
        let entries = outstanding(&ledger(), 2025, 3);
        assert_eq!(entries.len(), 2);

        let jane = &entries[0];
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.months, vec![1, 2, 3]);
        assert_eq!(jane.monthly_amount, 50.0);
        assert_eq!(jane.total, 150.0);

        let john = &entries[1];
        assert_eq!(john.monthly_amount, 25.0);
        assert_eq!(john.total, 75.0);
    }

    #[test]
    fn test_paid_months_excluded() {
        let mut ledger = ledger();
        let id = ledger.find_member_id("Jane Doe").unwrap();
        ledger.insert_record(&id, 2025, 2, record(2)).unwrap();
        let entries = outstanding(&ledger, 2025, 3);
        let jane = entries.iter().find(|e| e.name == "Jane Doe").unwrap();
        assert_eq!(jane.months, vec![1, 3]);
        assert_eq!(jane.total, 100.0);
    }

    #[test]
    fn test_fully_paid_member_omitted() {
        let mut ledger = ledger();
        let id = ledger.find_member_id("Jane Doe").unwrap();
        for month in 1..=3 {
            ledger.insert_record(&id, 2025, month, record(month)).unwrap();
        }
        let entries = outstanding(&ledger, 2025, 3);
        assert!(entries.iter().all(|e| e.name != "Jane Doe"));
    }

    #[test]
    fn test_inactive_members_skipped() {
        let entries = outstanding(&ledger(), 2025, 12);
        assert!(entries.iter().all(|e| e.name != "Max Idle"));
    }

    #[test]
    fn test_summary() {
        let s = summary(&ledger(), 2025, 3);
        assert_eq!(s.total_members, 2);
        assert_eq!(s.members_with_outstanding, 2);
        assert_eq!(s.total_outstanding, 225.0);
    }

    #[test]
    fn test_month_overview() {
        let mut ledger = ledger();
        let id = ledger.find_member_id("Jane Doe").unwrap();
        ledger.insert_record(&id, 2025, 1, record(1)).unwrap();
        let overview = month_overview(&ledger, 2025);
        assert_eq!(overview.len(), 12);
        assert_eq!(overview[0], MonthOverview { month: 1, paid: 1, unpaid: 2 });
        assert_eq!(overview[1], MonthOverview { month: 2, paid: 0, unpaid: 3 });
    }

    #[test]
    fn test_reminder_message_lists_months_and_total() {
        let entries = outstanding(&ledger(), 2025, 2);
        let jane = &entries[0];
        let msg = reminder_message(jane, 2025);
        assert!(msg.contains("Hello Jane Doe"));
        assert!(msg.contains("- January"));
        assert!(msg.contains("- February"));
        assert!(msg.contains("Total outstanding: CHF 100.00"));
    }

    #[test]
    fn test_export_reminders_writes_outstanding_rows_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.csv");

        let mut ledger = ledger();
        let id = ledger.find_member_id("John Roe").unwrap();
        for month in 1..=3 {
            ledger.insert_record(&id, 2025, month, record(month)).unwrap();
        }

        let exported = export_reminders(&path, &ledger, 2025, 3).unwrap();
        assert_eq!(exported, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Jane Doe"));
        assert!(!content.contains("John Roe"));
        assert!(!content.contains("Max Idle"));
    }
}
