use std::path::Path;

use imgstore::{Listing, OpenMode, Store};

use crate::errors::CliError;

pub fn run(path: &Path, json: bool) -> Result<(), CliError> {
    let store = Store::open(path, OpenMode::ReadOnly)?;

    if json {
        let listing = store.list(Listing::Structured)?.expect("Listing::Structured always returns Some");
        println!("{}", serde_json::to_string_pretty(&listing).expect("ImageListing always serializes"));
    } else {
        let mut stdout = std::io::stdout();
        store.list(Listing::Human(&mut stdout))?;
    }

    store.close();
    Ok(())
}
