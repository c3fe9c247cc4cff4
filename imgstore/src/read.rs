//! Read.

use std::io::{Read as _, Seek, SeekFrom};

use crate::error::ImgStoreError;
use crate::layout::Resolution;
use crate::resize;
use crate::store::Store;

impl Store {
    /// Reads the bytes of `id`'s `target` variant, lazily materializing it
    /// first if it is not yet present.
    pub fn read(&mut self, id: &str, target: Resolution) -> Result<Vec<u8>, ImgStoreError> {
        let index = self.find_slot_by_id(id).ok_or_else(|| ImgStoreError::FileNotFound(id.to_string()))?;

        if self.slots[index].size_of(target) == 0 {
            resize::lazily_resize(self, index, target)?;
        }

        let offset = self.slots[index].offset_of(target);
        let size = self.slots[index].size_of(target) as usize;

        let mut buf = vec![0u8; size];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }
}
