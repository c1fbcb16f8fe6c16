use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::assigner::assign;
use crate::batch::write_batch;
use crate::error::Result;
use crate::ledger::LEDGER_FILE;
use crate::mappings::{MappingStore, MAPPINGS_FILE};
use crate::parser::parse_statement;

pub fn run(data_dir: &Path, file: &str, out: Option<&str>) -> Result<()> {
    let statement = PathBuf::from(file);
    let mappings = MappingStore::load(&data_dir.join(MAPPINGS_FILE))?;
    // Loaded only so a missing init shows up here instead of at commit time.
    crate::ledger::Ledger::load(&data_dir.join(LEDGER_FILE))?;

    let mut batch = parse_statement(&statement)?;
    if mappings.is_empty() {
        println!("No mappings yet; member assignments will all need review.");
    }
    assign(&mut batch, &mappings);

    let out_path = match out {
        Some(p) => PathBuf::from(p),
        None => statement.with_file_name("batch.csv"),
    };
    write_batch(&out_path, &batch)?;

    let assigned = batch.iter().filter(|tx| tx.member.is_some()).count();
    let unresolved = batch.len() - assigned;
    println!(
        "{} credit transactions written to {}",
        batch.len(),
        out_path.display()
    );
    println!("{assigned} auto-assigned from mappings, {unresolved} need review");
    if unresolved > 0 {
        println!(
            "{}",
            "Fill in the blank member/month cells, then run: dues commit".yellow()
        );
    } else {
        println!("{}", format!("Review the file, then run: dues commit {}", out_path.display()).green());
    }
    Ok(())
}
