//! Insert.

use sha2::{Digest, Sha256};
use std::io::{Seek, SeekFrom, Write};

use crate::dedup::{self, DedupOutcome};
use crate::error::ImgStoreError;
use crate::layout::{Resolution, Slot, Validity, MAX_IMG_ID};
use crate::resize;
use crate::store::Store;

impl Store {
    /// Inserts `bytes` (a JPEG image) under `id`.
    ///
    /// Requires `0 < id.len() <= MAX_IMG_ID` and `num_files < max_files`.
    /// Hashes the content, allocates the first free slot, runs the dedup
    /// engine, conditionally appends the blob, records the original
    /// resolution, and flushes the slot then the header (see DESIGN.md for
    /// the ordering rationale).
    pub fn insert(&mut self, bytes: &[u8], id: &str) -> Result<(), ImgStoreError> {
        if id.is_empty() || id.len() > MAX_IMG_ID {
            return Err(ImgStoreError::InvalidImgId(format!(
                "id must be 1..={MAX_IMG_ID} bytes, got {}",
                id.len()
            )));
        }
        if self.header.num_files >= self.header.max_files {
            return Err(ImgStoreError::FullImgStore);
        }

        let index = self.find_first_free_slot().ok_or(ImgStoreError::FullImgStore)?;

        let sha = Sha256::digest(bytes);
        let mut slot = Slot::empty();
        slot.img_id = id.to_string();
        slot.sha.copy_from_slice(&sha);
        slot.size[Resolution::Orig.index()] = bytes.len() as u32;
        slot.is_valid = Validity::NonEmpty;
        self.slots[index] = slot;

        let outcome = dedup::dedup(&mut self.slots, index)?;

        if outcome == DedupOutcome::NotDuplicate {
            self.file.seek(SeekFrom::End(0))?;
            let append_offset = self.file.stream_position()?;
            self.file.write_all(bytes)?;
            self.slots[index].offset[Resolution::Orig.index()] = append_offset;
        }

        let (width, height) = resize::get_resolution(bytes)?;
        self.slots[index].res_orig = (width, height);

        self.header.num_files += 1;
        self.header.version += 1;

        self.flush_slot(index)?;
        self.flush_header()?;

        log::debug!("inserted '{id}' at slot {index} ({} bytes)", bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CreateConfig;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn make_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
        buf.into_inner()
    }

    #[test]
    fn insert_then_read_round_trips_bytes() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        let bytes = make_jpeg(10, 10);
        store.insert(&bytes, "pic1").unwrap();

        let read_back = store.read("pic1", Resolution::Orig).unwrap();
        assert_eq!(read_back, bytes);
        assert_eq!(store.header.num_files, 1);
        assert_eq!(store.header.version, 1);
    }

    #[test]
    fn insert_into_full_store_fails() {
        let tmp = NamedTempFile::new().unwrap();
        let config = CreateConfig {
            max_files: 1,
            ..CreateConfig::default()
        };
        let mut store = Store::create(tmp.path(), config).unwrap();
        let bytes = make_jpeg(4, 4);
        store.insert(&bytes, "a").unwrap();
        let err = store.insert(&bytes, "b").unwrap_err();
        assert!(matches!(err, ImgStoreError::FullImgStore));
    }

    #[test]
    fn insert_rejects_bad_ids() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        let bytes = make_jpeg(4, 4);
        assert!(matches!(store.insert(&bytes, "").unwrap_err(), ImgStoreError::InvalidImgId(_)));
        let too_long = "x".repeat(128);
        assert!(matches!(store.insert(&bytes, &too_long).unwrap_err(), ImgStoreError::InvalidImgId(_)));
        let max_len = "x".repeat(127);
        assert!(store.insert(&bytes, &max_len).is_ok());
    }

    #[test]
    fn duplicate_content_shares_orig_offset() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        let bytes = make_jpeg(8, 8);
        store.insert(&bytes, "a").unwrap();
        store.insert(&bytes, "b").unwrap();

        assert_eq!(store.header.num_files, 2);
        let a = store.find_slot_by_id("a").unwrap();
        let b = store.find_slot_by_id("b").unwrap();
        assert_eq!(store.slots[a].offset_of(Resolution::Orig), store.slots[b].offset_of(Resolution::Orig));
    }

    #[test]
    fn duplicate_id_with_different_content_fails() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        store.insert(&make_jpeg(8, 8), "a").unwrap();
        let err = store.insert(&make_jpeg(9, 9), "a").unwrap_err();
        assert!(matches!(err, ImgStoreError::DuplicateId(_)));
    }

    #[test]
    fn reinsert_after_delete_succeeds() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        let bytes = make_jpeg(6, 6);
        store.insert(&bytes, "a").unwrap();
        store.delete("a").unwrap();
        store.insert(&bytes, "a").unwrap();
        let read_back = store.read("a", Resolution::Orig).unwrap();
        assert_eq!(read_back, bytes);
    }
}
