use std::path::Path;

use colored::Colorize;

use crate::batch::read_batch;
use crate::error::Result;
use crate::fmt::chf;
use crate::ledger::{Ledger, LEDGER_FILE};
use crate::mappings::{MappingStore, MAPPINGS_FILE};
use crate::reconciler::commit;

pub fn run(data_dir: &Path, file: &str) -> Result<()> {
    let ledger_path = data_dir.join(LEDGER_FILE);
    let mappings_path = data_dir.join(MAPPINGS_FILE);

    let mut ledger = Ledger::load(&ledger_path)?;
    let mut mappings = MappingStore::load(&mappings_path)?;

    let batch = read_batch(Path::new(file))?;
    let total: f64 = batch.iter().map(|tx| tx.amount).sum();

    // Validation failures surface here; nothing has been written yet.
    let outcome = commit(&batch, &mut ledger, &mut mappings)?;

    // Persist both stores after the whole batch. If this fails the batch
    // file is untouched and commit can simply be re-run.
    ledger.save(&ledger_path)?;
    mappings.save(&mappings_path)?;

    println!(
        "{}",
        format!("Recorded {} contributions ({})", outcome.recorded, chf(total)).green()
    );
    if outcome.learned > 0 {
        println!("Learned {} new mapping(s) for future imports", outcome.learned);
    }
    for name in &outcome.skipped {
        println!(
            "{}",
            format!("Warning: member not found, rows skipped: {name}").yellow()
        );
    }
    Ok(())
}
