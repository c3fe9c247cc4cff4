use miette::Diagnostic;
use thiserror::Error;

/// Errors specific to argument parsing and CLI plumbing, as distinct from
/// [`imgstore::ImgStoreError`], which every subcommand's store operations
/// can also raise.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// `create --thumb_res`/`--small_res` received a count of values other
    /// than two (clap's `num_args = 2` already rejects most malformed
    /// input, but not a default value read from config).
    #[error("resolution must be given as exactly two values, WIDTH and HEIGHT")]
    #[diagnostic(code(imgstore_cli::args::resolution_shape))]
    BadResolutionShape,

    /// The store operation itself failed.
    #[error(transparent)]
    #[diagnostic(code(imgstore_cli::store))]
    Store(#[from] imgstore::ImgStoreError),

    /// Reading or writing a file passed on the command line failed.
    #[error("I/O error: {0}")]
    #[diagnostic(code(imgstore_cli::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// The exit code reported to the shell: delegates to
    /// [`imgstore::ImgStoreError::exit_code`] where applicable, otherwise
    /// falls back to `6` (`InvalidArgument`) or `1` (`Io`).
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::BadResolutionShape => 6,
            CliError::Store(err) => err.exit_code(),
            CliError::Io(_) => 1,
        }
    }
}
