use std::path::Path;

use imgstore::{OpenMode, Store};

use crate::errors::CliError;
use crate::formatting::success;

pub fn run(path: &Path, id: &str) -> Result<(), CliError> {
    let mut store = Store::open(path, OpenMode::ReadWrite)?;
    store.delete(id)?;
    success(format!("deleted '{id}'"));
    store.close();
    Ok(())
}
