use std::path::Path;

use imgstore::{CreateConfig, ResTarget, Store};

use crate::errors::CliError;
use crate::formatting::success;

pub fn run(path: &Path, max_files: Option<u32>, thumb_res: Option<Vec<u16>>, small_res: Option<Vec<u16>>) -> Result<(), CliError> {
    let mut config = CreateConfig::default();
    if let Some(max_files) = max_files {
        config.max_files = max_files;
    }
    if let Some(res) = thumb_res {
        config.res_thumb = res_target(&res)?;
    }
    if let Some(res) = small_res {
        config.res_small = res_target(&res)?;
    }

    let store = Store::create(path, config)?;
    success(format!("created {} ({} slots)", path.display(), store.header().max_files));
    store.close();
    Ok(())
}

fn res_target(values: &[u16]) -> Result<ResTarget, CliError> {
    match values {
        [width, height] => Ok(ResTarget { width: *width, height: *height }),
        _ => Err(CliError::BadResolutionShape),
    }
}
