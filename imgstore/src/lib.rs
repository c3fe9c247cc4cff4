#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

/// On-disk layout: the fixed-size header and slot records, and the
/// [`Resolution`] enum every operation is parameterized over.
pub mod layout;

/// The error taxonomy shared by every operation, plus the process exit
/// code each variant maps to.
pub mod error;

/// Store lifecycle (`create`/`open`/`close`) and the flush primitives
/// every mutating operation shares.
pub mod store;

/// Content-deduplication engine run by `insert`.
pub mod dedup;

/// Lazy thumbnail / small-variant resizing.
pub mod resize;

/// `insert`.
pub mod insert;

/// `read`.
pub mod read;

/// `delete`.
pub mod delete;

/// Garbage collection / compaction.
pub mod gc;

/// Listing.
pub mod list;

pub use error::ImgStoreError;
pub use gc::compact;
pub use layout::{Header, ResTarget, Resolution, Slot};
pub use list::{ImageListing, Listing};
pub use store::{CreateConfig, OpenMode, Store};
