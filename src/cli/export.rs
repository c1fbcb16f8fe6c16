use std::path::{Path, PathBuf};

use crate::cli::parse_month_opt;
use crate::error::Result;
use crate::ledger::{Ledger, LEDGER_FILE};
use crate::reports::export_reminders;

pub fn reminders(data_dir: &Path, output: Option<&str>, month: Option<&str>) -> Result<()> {
    let ledger = Ledger::load(&data_dir.join(LEDGER_FILE))?;
    let (year, up_to) = parse_month_opt(month)?;

    let out_path = match output {
        Some(p) => PathBuf::from(p),
        None => data_dir.join("reminders.csv"),
    };
    let exported = export_reminders(&out_path, &ledger, year, up_to)?;
    println!("Exported {exported} reminder(s) to {}", out_path.display());
    Ok(())
}
