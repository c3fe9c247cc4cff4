mod create;
mod delete;
mod gc;
mod insert;
mod list;
mod read;

use crate::args::{App, Command};
use crate::errors::CliError;

pub fn run(app: App) -> Result<(), CliError> {
    match app.command {
        Command::Create { max_files, thumb_res, small_res } => create::run(&app.path, max_files, thumb_res, small_res),
        Command::List { json } => list::run(&app.path, json),
        Command::Insert { id, file } => insert::run(&app.path, &id, &file),
        Command::Read { id, resolution } => read::run(&app.path, &id, &resolution),
        Command::Delete { id } => delete::run(&app.path, &id),
        Command::Gc { tmp_path } => gc::run(&app.path, &tmp_path),
    }
}
