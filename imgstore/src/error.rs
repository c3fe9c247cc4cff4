//! The error taxonomy shared by every `imgstore` operation.

use thiserror::Error;

/// Every operation returns at most one variant.
#[derive(Error, Debug)]
pub enum ImgStoreError {
    /// A filesystem read/write/seek failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A buffer allocation failed or would exceed available memory.
    #[error("out of memory")]
    OutOfMemory,

    /// A command was invoked with too few positional arguments.
    #[error("not enough arguments")]
    NotEnoughArguments,

    /// A store path failed basic validity checks (e.g. empty).
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// An unrecognized CLI command was requested.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// An argument had the wrong shape or an out-of-range value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `max_files` was zero or exceeded [`crate::layout::MAX_MAX_FILES`].
    #[error("invalid max_files value: {0}")]
    MaxFiles(u32),

    /// A resolution name or target size was invalid.
    #[error("invalid resolution(s): {0}")]
    Resolutions(String),

    /// An image id was empty or longer than [`crate::layout::MAX_IMG_ID`] bytes.
    #[error("invalid image id: {0}")]
    InvalidImgId(String),

    /// The store has no free slot left (`num_files == max_files`).
    #[error("imgStore is full")]
    FullImgStore,

    /// No valid slot matches the requested id.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The requested operation is not implemented.
    #[error("not implemented")]
    NotImplemented,

    /// `insert` was called with an id already used by another valid slot
    /// with different content.
    #[error("duplicate image id: {0}")]
    DuplicateId(String),

    /// The JPEG codec failed to decode or encode a buffer.
    #[error("image library error: {0}")]
    ImgLib(String),

    /// A diagnostic-only condition, surfaced for `--debug` tracing; never
    /// returned by library code on its own.
    #[error("debug: {0}")]
    Debug(String),
}

impl ImgStoreError {
    /// The small positive process exit code each kind maps to.
    ///
    /// Kept next to the taxonomy so every caller (CLI, tests) shares one
    /// mapping instead of re-deriving it.
    pub fn exit_code(&self) -> i32 {
        match self {
            ImgStoreError::Io(_) => 1,
            ImgStoreError::OutOfMemory => 2,
            ImgStoreError::NotEnoughArguments => 3,
            ImgStoreError::InvalidFilename(_) => 4,
            ImgStoreError::InvalidCommand(_) => 5,
            ImgStoreError::InvalidArgument(_) => 6,
            ImgStoreError::MaxFiles(_) => 7,
            ImgStoreError::Resolutions(_) => 8,
            ImgStoreError::InvalidImgId(_) => 9,
            ImgStoreError::FullImgStore => 10,
            ImgStoreError::FileNotFound(_) => 11,
            ImgStoreError::NotImplemented => 12,
            ImgStoreError::DuplicateId(_) => 13,
            ImgStoreError::ImgLib(_) => 14,
            ImgStoreError::Debug(_) => 15,
        }
    }
}
