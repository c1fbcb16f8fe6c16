use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::mappings::{MappingStore, MAPPINGS_FILE};

pub fn list(data_dir: &Path) -> Result<()> {
    let store = MappingStore::load(&data_dir.join(MAPPINGS_FILE))?;
    let mut table = Table::new();
    table.set_header(vec!["#", "Details key", "Member"]);
    for (i, entry) in store.entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.details),
            Cell::new(&entry.member),
        ]);
    }
    println!("Mappings, {} entr{} (matched in this order)\n{table}", store.len(), if store.len() == 1 { "y" } else { "ies" });
    Ok(())
}

pub fn add(data_dir: &Path, details: &str, member: &str) -> Result<()> {
    let path = data_dir.join(MAPPINGS_FILE);
    let mut store = MappingStore::load(&path)?;
    store.add(details, member)?;
    store.save(&path)?;
    println!("Added mapping: '{}' -> {member}", details.trim());
    Ok(())
}
