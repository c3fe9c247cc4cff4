//! Deduplication engine.
//!
//! Given a freshly populated slot (identifier and sha set, `is_valid =
//! NonEmpty`, offsets/sizes still zero), a single pass over every other slot
//! both enforces id uniqueness and finds a content match, guaranteeing one
//! `O(max_files)` scan per insert.

use crate::error::ImgStoreError;
use crate::layout::{Resolution, Slot};

/// Result of running the dedup scan for a freshly inserted slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DedupOutcome {
    /// A peer slot with identical content was found; its attributes were
    /// copied onto the new slot already (caller must not write a new blob).
    Duplicate,
    /// No peer has the same content; the caller must still append the blob
    /// and set `offset[Orig]` itself.
    NotDuplicate,
}

/// Scans every slot but `index` for an id collision (hard error) or a
/// content match (dedup), mutating `slots[index]` in place on a match.
pub fn dedup(slots: &mut [Slot], index: usize) -> Result<DedupOutcome, ImgStoreError> {
    use crate::layout::Validity;

    let target_id = slots[index].img_id.clone();
    let target_sha = slots[index].sha;

    let mut content_match = None;
    for (i, slot) in slots.iter().enumerate() {
        if i == index || slot.is_valid != Validity::NonEmpty {
            continue;
        }
        if slot.img_id == target_id {
            return Err(ImgStoreError::DuplicateId(target_id));
        }
        if content_match.is_none() && slot.sha == target_sha {
            content_match = Some(i);
        }
    }

    match content_match {
        Some(peer) => {
            let peer_attrs = PeerAttributes::from(&slots[peer]);
            peer_attrs.apply(&mut slots[index]);
            Ok(DedupOutcome::Duplicate)
        }
        None => {
            slots[index].offset[Resolution::Orig.index()] = 0;
            Ok(DedupOutcome::NotDuplicate)
        }
    }
}

/// Everything copied from a content-duplicate peer onto the new slot:
/// `res_orig` and every variant's `size`/`offset`, deliberately excludes
/// `img_id`, `sha`, and `is_valid`, which the caller already set correctly.
struct PeerAttributes {
    res_orig: (u32, u32),
    size: [u32; crate::layout::NB_RES],
    offset: [u64; crate::layout::NB_RES],
}

impl PeerAttributes {
    fn from(slot: &Slot) -> Self {
        PeerAttributes {
            res_orig: slot.res_orig,
            size: slot.size,
            offset: slot.offset,
        }
    }

    fn apply(&self, slot: &mut Slot) {
        slot.res_orig = self.res_orig;
        slot.size = self.size;
        slot.offset = self.offset;
    }
}
