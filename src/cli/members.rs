use std::path::Path;

use chrono::{Datelike, Local};
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::ledger::{Ledger, LEDGER_FILE};
use crate::models::{MembershipClass, MONTH_NAMES};

pub fn add(data_dir: &Path, name: &str, class: &str, phone: &str, email: &str) -> Result<()> {
    let class = MembershipClass::parse(class)?;
    let path = data_dir.join(LEDGER_FILE);
    let mut ledger = Ledger::load(&path)?;
    let id = ledger.add_member(name, class, phone, email)?;
    ledger.save(&path)?;
    println!("Added member {name} ({id}, {})", class.label());
    Ok(())
}

pub fn list(data_dir: &Path, year: Option<i32>) -> Result<()> {
    let ledger = Ledger::load(&data_dir.join(LEDGER_FILE))?;
    let year = year.unwrap_or_else(|| Local::now().year());

    let mut header = vec!["ID", "Member", "Class", "Course"];
    header.extend(MONTH_NAMES.iter().map(|m| &m[..3]));

    let mut table = Table::new();
    table.set_header(header);
    for (id, member) in &ledger.members {
        let mut row = vec![
            Cell::new(id),
            Cell::new(&member.name),
            Cell::new(member.class.label()),
            Cell::new(if member.intro_course { "yes" } else { "" }),
        ];
        for month in 1..=12 {
            row.push(Cell::new(if member.has_paid(year, month) { "x" } else { "" }));
        }
        table.add_row(row);
    }
    println!("Members ({year})\n{table}");
    Ok(())
}
