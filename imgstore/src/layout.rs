//! On-disk layout: the fixed-size [`Header`] and [`Slot`] records and their
//! byte-exact little-endian codec.
//!
//! The file format is `[Header][Slot_0][Slot_1]...[Slot_{max-1}][blob...]`.
//! Header and slot records are fixed size so every slot can be located by
//! its index alone: slot `i` lives at byte offset
//! `HEADER_SIZE + i * SLOT_SIZE`, and the blob region begins at
//! `HEADER_SIZE + max_files * SLOT_SIZE`.

use crate::error::ImgStoreError;

/// Fixed ASCII tag identifying the format, as it appears (null-padded) at
/// the start of every store file.
pub const MAGIC: &[u8] = b"EPFL ImgStore binary";

/// Size in bytes of the [`Header::name`] field, including the terminating nul.
pub const NAME_SIZE: usize = 32;

/// Maximum length (in bytes, excluding the terminating nul) of an image id.
pub const MAX_IMG_ID: usize = 127;

/// Size in bytes of the [`Slot::img_id`] field, including the terminating nul.
pub const IMG_ID_SIZE: usize = MAX_IMG_ID + 1;

/// Smallest legal `max_files` capacity for a store.
pub const MIN_MAX_FILES: u32 = 1;

/// Largest legal `max_files` capacity for a store.
pub const MAX_MAX_FILES: u32 = 100_000;

/// Default capacity used by `create` when none is specified.
pub const DEFAULT_MAX_FILES: u32 = 10;

/// Default thumbnail width/height used by `create` when none is specified.
pub const DEFAULT_RES_THUMB: u16 = 64;

/// Largest legal thumbnail width/height.
pub const MAX_RES_THUMB: u16 = 128;

/// Default "small" width/height used by `create` when none is specified.
pub const DEFAULT_RES_SMALL: u16 = 256;

/// Largest legal "small" width/height.
pub const MAX_RES_SMALL: u16 = 512;

/// Number of bytes in a SHA-256 digest.
pub const SHA256_SIZE: usize = 32;

/// Number of distinct resolutions a slot tracks.
pub const NB_RES: usize = 3;

/// One of the three JPEG variants tracked per slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The small thumbnail variant, capped at [`MAX_RES_THUMB`] on each side.
    Thumb,
    /// The "small" variant, capped at [`MAX_RES_SMALL`] on each side.
    Small,
    /// The original, unmodified upload.
    Orig,
}

impl Resolution {
    /// All three resolutions, in slot-array order (`size`/`offset` index order).
    pub const ALL: [Resolution; NB_RES] = [Resolution::Thumb, Resolution::Small, Resolution::Orig];

    /// The index of this resolution into a slot's `size`/`offset` arrays.
    pub fn index(self) -> usize {
        match self {
            Resolution::Thumb => 0,
            Resolution::Small => 1,
            Resolution::Orig => 2,
        }
    }

    /// Parses a resolution name.
    ///
    /// Accepts `"thumb"`/`"thumbnail"`, `"small"`, `"orig"`/`"original"`.
    pub fn parse(name: &str) -> Result<Self, ImgStoreError> {
        match name {
            "thumb" | "thumbnail" => Ok(Resolution::Thumb),
            "small" => Ok(Resolution::Small),
            "orig" | "original" => Ok(Resolution::Orig),
            other => Err(ImgStoreError::Resolutions(other.to_string())),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resolution::Thumb => "thumb",
            Resolution::Small => "small",
            Resolution::Orig => "orig",
        };
        f.write_str(name)
    }
}

/// Maximum width/height pair allowed for a given resized resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResTarget {
    /// Maximum width, in pixels.
    pub width: u16,
    /// Maximum height, in pixels.
    pub height: u16,
}

/// Store-wide configuration written once at `create` time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    /// Number of valid slots currently in use.
    pub num_files: u32,
    /// Immutable capacity, in `[MIN_MAX_FILES, MAX_MAX_FILES]`.
    pub max_files: u32,
    /// Monotonic counter, incremented on every mutating operation.
    pub version: u32,
    /// Maximum thumbnail width/height.
    pub res_thumb: ResTarget,
    /// Maximum small-variant width/height.
    pub res_small: ResTarget,
}

/// Encoded size in bytes of a [`Header`] record.
pub const HEADER_SIZE: usize = NAME_SIZE + 4 + 4 + 4 + 2 * 4 + 4 + 8;

impl Header {
    /// Builds a header template for `create`, validating `max_files` and the
    /// two resized-resolution bounds.
    pub fn new(max_files: u32, res_thumb: ResTarget, res_small: ResTarget) -> Result<Self, ImgStoreError> {
        if !(MIN_MAX_FILES..=MAX_MAX_FILES).contains(&max_files) {
            return Err(ImgStoreError::MaxFiles(max_files));
        }
        if res_thumb.width > MAX_RES_THUMB || res_thumb.height > MAX_RES_THUMB {
            return Err(ImgStoreError::Resolutions(format!(
                "thumbnail resolution {}x{} exceeds {MAX_RES_THUMB}x{MAX_RES_THUMB}",
                res_thumb.width, res_thumb.height
            )));
        }
        if res_small.width > MAX_RES_SMALL || res_small.height > MAX_RES_SMALL {
            return Err(ImgStoreError::Resolutions(format!(
                "small resolution {}x{} exceeds {MAX_RES_SMALL}x{MAX_RES_SMALL}",
                res_small.width, res_small.height
            )));
        }
        Ok(Header {
            num_files: 0,
            max_files,
            version: 0,
            res_thumb,
            res_small,
        })
    }

    /// Byte offset of the blob region: just past the slot table.
    pub fn blob_region_start(&self) -> u64 {
        HEADER_SIZE as u64 + self.max_files as u64 * SLOT_SIZE as u64
    }

    /// Byte offset of slot `index` within the slot table.
    pub fn slot_offset(&self, index: usize) -> u64 {
        HEADER_SIZE as u64 + index as u64 * SLOT_SIZE as u64
    }

    pub(crate) fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let mut name = [0u8; NAME_SIZE];
        name[..MAGIC.len()].copy_from_slice(MAGIC);
        buf[0..NAME_SIZE].copy_from_slice(&name);
        let mut off = NAME_SIZE;
        buf[off..off + 4].copy_from_slice(&self.version.to_le_bytes());
        off += 4;
        buf[off..off + 4].copy_from_slice(&self.num_files.to_le_bytes());
        off += 4;
        buf[off..off + 4].copy_from_slice(&self.max_files.to_le_bytes());
        off += 4;
        buf[off..off + 2].copy_from_slice(&self.res_thumb.width.to_le_bytes());
        off += 2;
        buf[off..off + 2].copy_from_slice(&self.res_thumb.height.to_le_bytes());
        off += 2;
        buf[off..off + 2].copy_from_slice(&self.res_small.width.to_le_bytes());
        off += 2;
        buf[off..off + 2].copy_from_slice(&self.res_small.height.to_le_bytes());
        off += 2;
        // remaining bytes (reserved) stay zero
        debug_assert_eq!(off + 4 + 8, HEADER_SIZE);
        buf
    }

    pub(crate) fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, ImgStoreError> {
        let name = &buf[0..NAME_SIZE];
        if !name.starts_with(MAGIC) {
            return Err(ImgStoreError::InvalidFilename(
                "not an imgstore file: bad magic".to_string(),
            ));
        }
        let mut off = NAME_SIZE;
        let version = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        off += 4;
        let num_files = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        off += 4;
        let max_files = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        off += 4;
        let thumb_w = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        off += 2;
        let thumb_h = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        off += 2;
        let small_w = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        off += 2;
        let small_h = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        Ok(Header {
            num_files,
            max_files,
            version,
            res_thumb: ResTarget {
                width: thumb_w,
                height: thumb_h,
            },
            res_small: ResTarget {
                width: small_w,
                height: small_h,
            },
        })
    }
}

/// Whether a slot is currently in use.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The slot is free and may be allocated by `insert`.
    Empty,
    /// The slot holds a live image.
    NonEmpty,
}

/// One preallocated metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Unique identifier of this image, `1..=MAX_IMG_ID` bytes when valid.
    pub img_id: String,
    /// SHA-256 digest of the original image bytes.
    pub sha: [u8; SHA256_SIZE],
    /// Width/height of the original image.
    pub res_orig: (u32, u32),
    /// Byte length of each variant; `0` means absent.
    pub size: [u32; NB_RES],
    /// Byte offset of each variant in the file; `0` means absent.
    pub offset: [u64; NB_RES],
    /// Whether this slot currently holds a live image.
    pub is_valid: Validity,
}

/// Encoded size in bytes of a [`Slot`] record.
pub const SLOT_SIZE: usize = IMG_ID_SIZE + SHA256_SIZE + 2 * 4 + NB_RES * 4 + NB_RES * 8 + 2 + 2;

impl Slot {
    /// An empty slot, as written by `create` for every preallocated entry.
    pub fn empty() -> Self {
        Slot {
            img_id: String::new(),
            sha: [0u8; SHA256_SIZE],
            res_orig: (0, 0),
            size: [0; NB_RES],
            offset: [0; NB_RES],
            is_valid: Validity::Empty,
        }
    }

    /// Byte length of the stored original, or `0` if this slot is empty.
    pub fn size_of(&self, res: Resolution) -> u32 {
        self.size[res.index()]
    }

    /// Byte offset in the file of the given variant, or `0` if absent.
    pub fn offset_of(&self, res: Resolution) -> u64 {
        self.offset[res.index()]
    }

    pub(crate) fn to_bytes(&self) -> [u8; SLOT_SIZE] {
        let mut buf = [0u8; SLOT_SIZE];
        let mut off = 0;

        let id_bytes = self.img_id.as_bytes();
        debug_assert!(id_bytes.len() <= MAX_IMG_ID);
        buf[off..off + id_bytes.len()].copy_from_slice(id_bytes);
        off += IMG_ID_SIZE;

        buf[off..off + SHA256_SIZE].copy_from_slice(&self.sha);
        off += SHA256_SIZE;

        buf[off..off + 4].copy_from_slice(&self.res_orig.0.to_le_bytes());
        off += 4;
        buf[off..off + 4].copy_from_slice(&self.res_orig.1.to_le_bytes());
        off += 4;

        for size in &self.size {
            buf[off..off + 4].copy_from_slice(&size.to_le_bytes());
            off += 4;
        }
        for offset in &self.offset {
            buf[off..off + 8].copy_from_slice(&offset.to_le_bytes());
            off += 8;
        }

        let is_valid: u16 = match self.is_valid {
            Validity::Empty => 0,
            Validity::NonEmpty => 1,
        };
        buf[off..off + 2].copy_from_slice(&is_valid.to_le_bytes());
        off += 2;
        // final 2 bytes stay reserved/zero
        debug_assert_eq!(off + 2, SLOT_SIZE);
        buf
    }

    pub(crate) fn from_bytes(buf: &[u8; SLOT_SIZE]) -> Self {
        let mut off = 0;

        let id_raw = &buf[off..off + IMG_ID_SIZE];
        let nul = id_raw.iter().position(|&b| b == 0).unwrap_or(id_raw.len());
        let img_id = String::from_utf8_lossy(&id_raw[..nul]).into_owned();
        off += IMG_ID_SIZE;

        let mut sha = [0u8; SHA256_SIZE];
        sha.copy_from_slice(&buf[off..off + SHA256_SIZE]);
        off += SHA256_SIZE;

        let width = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        off += 4;
        let height = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        off += 4;

        let mut size = [0u32; NB_RES];
        for s in &mut size {
            *s = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
            off += 4;
        }
        let mut offset = [0u64; NB_RES];
        for o in &mut offset {
            *o = u64::from_le_bytes(buf[off..off + 8].try_into().unwrap());
            off += 8;
        }

        let is_valid_raw = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        let is_valid = if is_valid_raw == 1 {
            Validity::NonEmpty
        } else {
            Validity::Empty
        };

        Slot {
            img_id,
            sha,
            res_orig: (width, height),
            size,
            offset,
            is_valid,
        }
    }
}
