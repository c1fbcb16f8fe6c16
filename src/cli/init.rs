use std::path::PathBuf;

use crate::error::Result;
use crate::ledger::{Ledger, LEDGER_FILE};
use crate::mappings::{MappingStore, MAPPINGS_FILE};
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    // With an explicit --data-dir the settings file is left alone, so
    // throwaway directories (tests, experiments) don't change the default.
    let resolved = match data_dir {
        Some(dir) => PathBuf::from(shellexpand_path(&dir)),
        None => {
            let settings = load_settings();
            save_settings(&settings)?;
            PathBuf::from(&settings.data_dir)
        }
    };
    std::fs::create_dir_all(&resolved)?;

    let ledger_path = resolved.join(LEDGER_FILE);
    if !ledger_path.exists() {
        Ledger::default().save(&ledger_path)?;
    }
    let mappings_path = resolved.join(MAPPINGS_FILE);
    if !mappings_path.exists() {
        MappingStore::default().save(&mappings_path)?;
    }

    println!("Initialized dues at {}", resolved.display());
    Ok(())
}
