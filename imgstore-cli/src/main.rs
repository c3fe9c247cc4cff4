#![forbid(unsafe_code)]

mod args;
mod commands;
mod errors;
mod formatting;

use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = args::App::parse();
    log::debug!("running {:?} against {}", args.command, args.path.display());

    if let Err(err) = commands::run(args) {
        eprintln!("ERROR: {err}");
        std::process::exit(err.exit_code());
    }
}
