pub mod commit;
pub mod export;
pub mod import;
pub mod init;
pub mod mappings;
pub mod members;
pub mod report;

use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};

use crate::error::Result;

/// Parse an optional YYYY-MM cut-off; defaults to the current year/month.
pub(crate) fn parse_month_opt(month: Option<&str>) -> Result<(i32, u32)> {
    match month {
        Some(m) => {
            let parts: Vec<&str> = m.split('-').collect();
            let parsed = if parts.len() == 2 {
                match (parts[0].parse::<i32>(), parts[1].parse::<u32>()) {
                    (Ok(y), Ok(mo)) if (1..=12).contains(&mo) => Some((y, mo)),
                    _ => None,
                }
            } else {
                None
            };
            parsed.ok_or_else(|| {
                crate::error::DuesError::Other(format!("invalid month '{m}', expected YYYY-MM"))
            })
        }
        None => {
            let now = Local::now();
            Ok((now.year(), now.month()))
        }
    }
}

#[derive(Parser)]
#[command(name = "dues", about = "Membership dues reconciliation CLI for small clubs.")]
pub struct Cli {
    /// Data directory holding ledger.json and mappings.json
    /// (default: from ~/.config/dues/settings.json)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up dues: record the data directory and create empty stores.
    Init,
    /// Manage members.
    Members {
        #[command(subcommand)]
        command: MembersCommands,
    },
    /// Parse a bank statement CSV into a review batch file.
    Import {
        /// Path to the statement export (ZKB CSV)
        file: String,
        /// Where to write the review batch (default: batch.csv next to the statement)
        #[arg(long)]
        out: Option<String>,
    },
    /// Validate a reviewed batch file and merge it into the ledger.
    Commit {
        /// Path to the reviewed batch file
        file: String,
    },
    /// Manage learned details → member mappings.
    Mappings {
        #[command(subcommand)]
        command: MappingsCommands,
    },
    /// Outstanding payments report.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export payment reminders.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

#[derive(Subcommand)]
pub enum MembersCommands {
    /// Add a member.
    Add {
        /// Member display name (must be unique)
        name: String,
        /// Membership class: active, passive or inactive
        #[arg(long, default_value = "active")]
        class: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// List members and their payment status for a year.
    List {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum MappingsCommands {
    /// List learned mappings in insertion order.
    List,
    /// Seed a mapping manually.
    Add {
        /// Details substring to match (case-insensitive)
        details: String,
        /// Member name to assign
        member: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Unpaid periods and amounts owed per member.
    Outstanding {
        /// Cut-off month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Paid/unpaid member counts per month.
    Overview {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Write a reminder CSV for members with outstanding payments.
    Reminders {
        /// Output file (default: reminders.csv in the data directory)
        #[arg(long)]
        output: Option<String>,
        /// Cut-off month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
}
