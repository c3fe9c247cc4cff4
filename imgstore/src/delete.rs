//! Delete.
//!
//! Logical invalidation only, blob bytes are never reclaimed here; that is
//! [`crate::gc::compact`]'s job.

use crate::error::ImgStoreError;
use crate::layout::Validity;
use crate::store::Store;

impl Store {
    /// Invalidates the first valid slot whose id matches. Blob bytes
    /// referenced by any surviving slot that shares content with this one
    /// are left untouched, since their own `offset`/`size` fields are
    /// independent of this slot's `is_valid` flag.
    pub fn delete(&mut self, id: &str) -> Result<(), ImgStoreError> {
        let index = self.find_slot_by_id(id).ok_or_else(|| ImgStoreError::FileNotFound(id.to_string()))?;

        self.slots[index].is_valid = Validity::Empty;
        self.flush_slot(index)?;

        self.header.num_files -= 1;
        self.header.version += 1;
        self.flush_header()?;

        log::debug!("deleted '{id}' (slot {index})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Resolution;
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
    fn delete_missing_id_fails() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        assert!(matches!(store.delete("nope").unwrap_err(), ImgStoreError::FileNotFound(_)));
    }

    #[test]
    fn delete_then_read_fails_but_peer_survives() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = Store::create(tmp.path(), CreateConfig::default()).unwrap();
        let bytes = make_jpeg(10, 10);
        store.insert(&bytes, "a").unwrap();
        store.insert(&bytes, "b").unwrap(); // shares content with "a"

        store.delete("a").unwrap();
        assert!(matches!(store.read("a", Resolution::Orig).unwrap_err(), ImgStoreError::FileNotFound(_)));

        let still_there = store.read("b", Resolution::Orig).unwrap();
        assert_eq!(still_there, bytes);
        assert_eq!(store.header.num_files, 1);
    }
}
