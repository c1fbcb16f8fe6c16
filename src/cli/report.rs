use std::path::Path;

use chrono::{Datelike, Local};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::parse_month_opt;
use crate::error::Result;
use crate::fmt::chf;
use crate::ledger::{Ledger, LEDGER_FILE};
use crate::models::month_label;
use crate::reports::{month_overview, outstanding, summary};

pub fn outstanding_report(data_dir: &Path, month: Option<&str>) -> Result<()> {
    let ledger = Ledger::load(&data_dir.join(LEDGER_FILE))?;
    let (year, up_to) = parse_month_opt(month)?;

    let entries = outstanding(&ledger, year, up_to);
    if entries.is_empty() {
        println!(
            "{}",
            format!("All contributing members are paid up through {} {year}.", month_label(up_to)).green()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Member", "Class", "Outstanding months", "Monthly", "Total"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(&entry.member_id),
            Cell::new(&entry.name),
            Cell::new(entry.class.label()),
            Cell::new(entry.month_names().join(", ")),
            Cell::new(chf(entry.monthly_amount)),
            Cell::new(chf(entry.total)),
        ]);
    }
    println!("Outstanding through {} {year}\n{table}", month_label(up_to));

    let s = summary(&ledger, year, up_to);
    println!(
        "{}/{} members with outstanding payments, {} total",
        s.members_with_outstanding,
        s.total_members,
        chf(s.total_outstanding)
    );
    Ok(())
}

pub fn overview(data_dir: &Path, year: Option<i32>) -> Result<()> {
    let ledger = Ledger::load(&data_dir.join(LEDGER_FILE))?;
    let year = year.unwrap_or_else(|| Local::now().year());

    let mut table = Table::new();
    table.set_header(vec!["Month", "Paid", "Unpaid"]);
    for row in month_overview(&ledger, year) {
        table.add_row(vec![
            Cell::new(month_label(row.month)),
            Cell::new(row.paid),
            Cell::new(row.unpaid),
        ]);
    }
    println!("Payment overview {year}\n{table}");
    Ok(())
}
