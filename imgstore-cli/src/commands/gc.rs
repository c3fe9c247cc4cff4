use std::path::Path;

use crate::errors::CliError;
use crate::formatting::success;

pub fn run(path: &Path, tmp_path: &Path) -> Result<(), CliError> {
    imgstore::compact(path, tmp_path)?;
    success(format!("compacted {}", path.display()));
    Ok(())
}
