//! Garbage collector / compaction.
//!
//! A free function rather than a `Store` method: compaction needs two open
//! handles at once (the source being read, the replacement being written),
//! and a `&mut self` method can't also hold a second `Store` borrowed from
//! the same file.

use std::path::Path;

use crate::error::ImgStoreError;
use crate::layout::Resolution;
use crate::store::{CreateConfig, OpenMode, Store};

/// Rewrites the store at `path` into a fresh file at `tmp_path`, keeping
/// only valid slots and dropping every tombstoned (deleted) one, then
/// replaces `path` with the result.
///
/// `tmp_path` must be on the same filesystem as `path` for the final
/// rename to be atomic. On any failure before the rename, `path` is left
/// untouched and `tmp_path` is removed if it was created.
pub fn compact(path: impl AsRef<Path>, tmp_path: impl AsRef<Path>) -> Result<(), ImgStoreError> {
    let path = path.as_ref();
    let tmp_path = tmp_path.as_ref();

    let mut source = Store::open(path, OpenMode::ReadWrite)?;

    let config = CreateConfig {
        max_files: source.header().max_files,
        res_thumb: source.header().res_thumb,
        res_small: source.header().res_small,
    };

    let result = (|| -> Result<(), ImgStoreError> {
        let mut dest = Store::create(tmp_path, config)?;

        let ids: Vec<String> = source
            .slots()
            .iter()
            .filter(|s| s.is_valid == crate::layout::Validity::NonEmpty)
            .map(|s| s.img_id.clone())
            .collect();

        for id in ids {
            let index = source.find_slot_by_id(&id).expect("id was just listed from this store");
            let wants_thumb = source.slots()[index].size_of(Resolution::Thumb) > 0;
            let wants_small = source.slots()[index].size_of(Resolution::Small) > 0;

            let orig_bytes = source.read(&id, Resolution::Orig)?;
            dest.insert(&orig_bytes, &id)?;

            if wants_thumb {
                dest.read(&id, Resolution::Thumb)?;
            }
            if wants_small {
                dest.read(&id, Resolution::Small)?;
            }
        }

        dest.close();
        Ok(())
    })();

    if let Err(err) = result {
        let _ = std::fs::remove_file(tmp_path);
        return Err(err);
    }

    source.close();
    std::fs::remove_file(path)?;
    std::fs::rename(tmp_path, path)?;

    log::debug!("compacted {}", path.display());
    Ok(())
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
    fn compact_drops_deleted_slots_and_keeps_live_data() {
        let store_file = NamedTempFile::new().unwrap();
        let path = store_file.path().to_path_buf();
        let tmp_path = path.with_extension("compact.tmp");

        let mut store = Store::create(&path, CreateConfig::default()).unwrap();
        let bytes_a = make_jpeg(16, 16);
        let bytes_b = make_jpeg(20, 10);
        store.insert(&bytes_a, "a").unwrap();
        store.insert(&bytes_b, "b").unwrap();
        store.read("b", Resolution::Thumb).unwrap(); // materialize a variant before compacting
        store.delete("a").unwrap();
        store.close();

        compact(&path, &tmp_path).unwrap();
        assert!(!tmp_path.exists());

        let mut reopened = Store::open(&path, OpenMode::ReadWrite).unwrap();
        assert!(reopened.find_slot_by_id("a").is_none());
        let index = reopened.find_slot_by_id("b").unwrap();
        assert!(reopened.slots()[index].size_of(Resolution::Thumb) > 0);
        let orig = reopened.read("b", Resolution::Orig).unwrap();
        assert_eq!(orig, bytes_b);
        assert_eq!(reopened.header().num_files, 1);
    }

    #[test]
    fn compact_of_already_compact_store_is_a_no_op_for_ids() {
        let store_file = NamedTempFile::new().unwrap();
        let path = store_file.path().to_path_buf();
        let tmp_path = path.with_extension("compact.tmp");

        let mut store = Store::create(&path, CreateConfig::default()).unwrap();
        store.insert(&make_jpeg(8, 8), "only").unwrap();
        store.close();

        compact(&path, &tmp_path).unwrap();

        let mut reopened = Store::open(&path, OpenMode::ReadWrite).unwrap();
        assert!(reopened.find_slot_by_id("only").is_some());
        assert_eq!(reopened.header().num_files, 1);
    }
}
