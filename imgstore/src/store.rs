//! Store lifecycle: open/create/close, plus the flush primitives every
//! mutating operation shares.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::ImgStoreError;
use crate::layout::{Header, ResTarget, Slot, DEFAULT_MAX_FILES, DEFAULT_RES_SMALL, DEFAULT_RES_THUMB, HEADER_SIZE, SLOT_SIZE};

/// Whether a store is opened for reading only, or for reading and writing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only: mutating operations will fail at the filesystem layer.
    ReadOnly,
    /// Read-write: the mode every mutating operation requires.
    ReadWrite,
}

/// Header template passed to [`Store::create`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CreateConfig {
    /// Immutable capacity for the new store.
    pub max_files: u32,
    /// Maximum thumbnail width/height.
    pub res_thumb: ResTarget,
    /// Maximum small-variant width/height.
    pub res_small: ResTarget,
}

impl Default for CreateConfig {
    fn default() -> Self {
        CreateConfig {
            max_files: DEFAULT_MAX_FILES,
            res_thumb: ResTarget {
                width: DEFAULT_RES_THUMB,
                height: DEFAULT_RES_THUMB,
            },
            res_small: ResTarget {
                width: DEFAULT_RES_SMALL,
                height: DEFAULT_RES_SMALL,
            },
        }
    }
}

/// The in-memory handle that owns the open file, the header, and a
/// contiguous mirror of all slots.
///
/// Single-writer: nothing here is `Send`/`Sync`-restricted beyond what
/// `File` already is, but concurrent use of one handle from multiple
/// threads is out of scope and not guarded against.
pub struct Store {
    pub(crate) file: File,
    pub(crate) header: Header,
    pub(crate) slots: Vec<Slot>,
}

impl Store {
    /// Creates the store at `path`, truncating any existing file, and
    /// writes the header plus `config.max_files` empty slots.
    pub fn create(path: impl AsRef<Path>, config: CreateConfig) -> Result<Self, ImgStoreError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ImgStoreError::InvalidFilename("empty path".to_string()));
        }

        let header = Header::new(config.max_files, config.res_thumb, config.res_small)?;

        let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;

        file.write_all(&header.to_bytes())?;
        let empty_slot = Slot::empty().to_bytes();
        for _ in 0..header.max_files {
            file.write_all(&empty_slot)?;
        }
        file.flush()?;

        let slots = vec![Slot::empty(); header.max_files as usize];
        log::debug!("created imgstore at {} ({} slots)", path.display(), header.max_files);

        Ok(Store { file, header, slots })
    }

    /// Opens an existing store, reading its header and full slot table into
    /// memory.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self, ImgStoreError> {
        let path = path.as_ref();
        let mut open_options = OpenOptions::new();
        open_options.read(true);
        if mode == OpenMode::ReadWrite {
            open_options.write(true);
        }
        let mut file = open_options.open(path)?;

        let mut header_buf = [0u8; HEADER_SIZE];
        file.read_exact(&mut header_buf)?;
        let header = Header::from_bytes(&header_buf)?;

        let mut slots = Vec::with_capacity(header.max_files as usize);
        let mut slot_buf = [0u8; SLOT_SIZE];
        for _ in 0..header.max_files {
            file.read_exact(&mut slot_buf)?;
            slots.push(Slot::from_bytes(&slot_buf));
        }

        let valid_count = slots.iter().filter(|s| s.is_valid == crate::layout::Validity::NonEmpty).count() as u32;
        let mut header = header;
        if valid_count != header.num_files {
            log::warn!(
                "header.num_files ({}) disagrees with valid slot count ({}); trusting the slot table",
                header.num_files,
                valid_count
            );
            header.num_files = valid_count;
        }

        Ok(Store { file, header, slots })
    }

    /// Releases the file handle and the slot mirror. Idempotent in the
    /// sense that dropping an already-closed handle is also fine, this
    /// just makes the teardown point explicit at call sites.
    pub fn close(self) {
        // `File` and `Vec<Slot>` are dropped here; nothing to flush, per
        // Callers flush per operation; nothing to do here.
    }

    /// The path-independent header snapshot, for `list`/`create` reporting.
    pub fn header(&self) -> Header {
        self.header
    }

    /// A read-only view of the slot mirror, in slot-array order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn flush_slot(&mut self, index: usize) -> Result<(), ImgStoreError> {
        let offset = self.header.slot_offset(index);
        let bytes = self.slots[index].to_bytes();
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&bytes)?;
        Ok(())
    }

    pub(crate) fn flush_header(&mut self) -> Result<(), ImgStoreError> {
        let bytes = self.header.to_bytes();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&bytes)?;
        Ok(())
    }

    pub(crate) fn find_first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_valid == crate::layout::Validity::Empty)
    }

    pub(crate) fn find_slot_by_id(&self, id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_valid == crate::layout::Validity::NonEmpty && s.img_id == id)
    }
}
