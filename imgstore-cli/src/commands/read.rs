use std::path::Path;

use imgstore::{OpenMode, Resolution, Store};

use crate::errors::CliError;
use crate::formatting::success;

pub fn run(path: &Path, id: &str, resolution: &str) -> Result<(), CliError> {
    let target = Resolution::parse(resolution)?;
    let mut store = Store::open(path, OpenMode::ReadWrite)?;
    let bytes = store.read(id, target)?;
    store.close();

    let out_path = format!("{id}_{target}.jpg");
    std::fs::write(&out_path, &bytes)?;
    success(format!("wrote {out_path} ({} bytes)", bytes.len()));
    Ok(())
}
