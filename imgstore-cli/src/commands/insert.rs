use std::path::Path;

use imgstore::{OpenMode, Store};

use crate::errors::CliError;
use crate::formatting::success;

pub fn run(path: &Path, id: &str, file: &Path) -> Result<(), CliError> {
    let bytes = std::fs::read(file)?;
    let mut store = Store::open(path, OpenMode::ReadWrite)?;
    store.insert(&bytes, id)?;
    success(format!("inserted '{id}' ({} bytes)", bytes.len()));
    store.close();
    Ok(())
}
