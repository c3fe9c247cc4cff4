//! Lazy resize pipeline: thumbnails and small variants are materialized
//! on first read, not at insert time.
//!
//! Decoding, resizing and re-encoding are delegated to the `image` crate.

use std::io::{Cursor, Seek, SeekFrom, Write};

use image::{DynamicImage, ImageFormat, imageops::FilterType};

use crate::error::ImgStoreError;
use crate::layout::{ResTarget, Resolution, Slot};
use crate::store::Store;

/// Decodes a JPEG buffer and returns its `(width, height)`.
pub fn get_resolution(bytes: &[u8]) -> Result<(u32, u32), ImgStoreError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| ImgStoreError::ImgLib(e.to_string()))?;
    Ok((image.width(), image.height()))
}

/// Computes the shrink target for `image` so that it fits within
/// `target.width x target.height` while preserving aspect ratio.
///
/// Same-axis divided by same-axis, so aspect ratio is preserved.
fn shrunk_dimensions(image: &DynamicImage, target: ResTarget) -> (u32, u32) {
    let (width, height) = (image.width(), image.height());
    let w_shrink = target.width as f64 / width as f64;
    let h_shrink = target.height as f64 / height as f64;
    let ratio = w_shrink.min(h_shrink);
    let new_width = ((width as f64) * ratio).round().max(1.0) as u32;
    let new_height = ((height as f64) * ratio).round().max(1.0) as u32;
    (new_width, new_height)
}

/// Materializes `target` for the slot at `index` if it is not already
/// present. A no-op (success) if `target == Orig` or the variant already
/// has a nonzero offset.
pub fn lazily_resize(store: &mut Store, index: usize, target: Resolution) -> Result<(), ImgStoreError> {
    if target == Resolution::Orig {
        return Ok(());
    }
    if store.slots[index].offset_of(target) != 0 {
        return Ok(());
    }

    let orig_offset = store.slots[index].offset_of(Resolution::Orig);
    let orig_size = store.slots[index].size_of(Resolution::Orig) as usize;

    let mut data = vec![0u8; orig_size];
    store.file.seek(SeekFrom::Start(orig_offset))?;
    std::io::Read::read_exact(&mut store.file, &mut data)?;

    let original =
        image::load_from_memory_with_format(&data, ImageFormat::Jpeg).map_err(|e| ImgStoreError::ImgLib(e.to_string()))?;

    let res_target = match target {
        Resolution::Thumb => store.header.res_thumb,
        Resolution::Small => store.header.res_small,
        Resolution::Orig => unreachable!("handled above"),
    };
    let (new_width, new_height) = shrunk_dimensions(&original, res_target);
    let resized = original.resize_exact(new_width, new_height, FilterType::Triangle);

    let mut encoded = Cursor::new(Vec::new());
    resized
        .write_to(&mut encoded, ImageFormat::Jpeg)
        .map_err(|e| ImgStoreError::ImgLib(e.to_string()))?;
    let encoded = encoded.into_inner();

    store.file.seek(SeekFrom::End(0))?;
    let append_offset = store.file.stream_position()?;
    store.file.write_all(&encoded)?;

    let idx = target.index();
    store.slots[index].offset[idx] = append_offset;
    store.slots[index].size[idx] = encoded.len() as u32;

    flush_slot(store, index)?;
    Ok(())
}

/// Writes only the slot record, matching the original `lazily_resize`,
/// which never touches the header (no header field changes on lazy
/// materialization, see DESIGN.md's Open Question decision).
fn flush_slot(store: &mut Store, index: usize) -> Result<(), ImgStoreError> {
    let offset = store.header.slot_offset(index);
    let bytes = Slot::to_bytes(&store.slots[index]);
    store.file.seek(SeekFrom::Start(offset))?;
    store.file.write_all(&bytes)?;
    Ok(())
}
