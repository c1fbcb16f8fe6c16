use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DuesError, Result};

/// Reconciliation purpose assigned to every imported row by default.
pub const PURPOSE_MEMBERSHIP: &str = "membership-fee";
/// Purpose for one-off introduction course payments.
pub const PURPOSE_INTRO_COURSE: &str = "introduction-course";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Human-readable label for a 1-based month number.
pub fn month_label(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize).saturating_sub(1).min(11)]
}

/// Two-digit month key used in the ledger ("01".."12").
pub fn month_key(month: u32) -> String {
    format!("{month:02}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipClass {
    Active,
    Passive,
    Inactive,
}

impl MembershipClass {
    /// Fixed monthly contribution in CHF for this class.
    pub fn monthly_amount(&self) -> f64 {
        match self {
            MembershipClass::Active => 50.0,
            MembershipClass::Passive => 25.0,
            MembershipClass::Inactive => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MembershipClass::Active => "active",
            MembershipClass::Passive => "passive",
            MembershipClass::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(MembershipClass::Active),
            "passive" => Ok(MembershipClass::Passive),
            "inactive" => Ok(MembershipClass::Inactive),
            other => Err(DuesError::UnknownClass(other.to_string())),
        }
    }
}

/// One recorded payment for a (member, year, month) slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub amount: f64,
    /// Payment date as YYYY-MM-DD; None for manual grid entries without one.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// "manual" or "statement-import".
    pub source: String,
    pub purpose: String,
    /// Free-text details of the originating bank transaction.
    #[serde(default)]
    pub details: String,
    pub month_label: String,
}

/// A statement row that survived the credit/amount/date filters.
///
/// Ephemeral: produced by the parser, defaulted by the assigner, edited by
/// the operator in the review file, consumed by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTransaction {
    pub date: NaiveDate,
    pub details: String,
    pub amount: f64,
    pub purpose: String,
    /// Display name of the assigned member; None until resolved.
    pub member: Option<String>,
    /// 1-based month of the contribution period; None until resolved.
    pub month: Option<u32>,
    /// The bank's own purpose text, informational only.
    pub remarks: String,
    /// Bank reference id; may be empty.
    pub reference: String,
}

impl CandidateTransaction {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}
