//! Listing.
//!
//! Modeled as a tagged enum over two output shapes, "human-text-to-sink"
//! and "structured-document-returned", rather than two unrelated
//! functions, so a caller picks one mode and gets exactly the matching
//! payload.

use std::io::Write;

use serde::Serialize;

use crate::error::ImgStoreError;
use crate::layout::{Resolution, Validity};
use crate::store::Store;

/// The structured listing document: `{"Images": [id, id, ...]}`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ImageListing {
    /// Identifiers of every valid slot, in slot order.
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

/// Which of the two listing shapes to produce.
pub enum Listing<'a> {
    /// Print header + every valid slot's metadata to `sink` (or the empty
    /// sentinel message if the store has no valid slots).
    Human(&'a mut dyn Write),
    /// Return the structured document instead of printing anything.
    Structured,
}

impl Store {
    /// Produces the listing per `mode`. Returns `Some(listing)` only for
    /// [`Listing::Structured`]; human mode writes to the sink and returns
    /// `None`.
    pub fn list(&self, mode: Listing<'_>) -> Result<Option<ImageListing>, ImgStoreError> {
        match mode {
            Listing::Human(sink) => {
                self.print_header(sink)?;
                let mut any = false;
                for slot in &self.slots {
                    if slot.is_valid == Validity::NonEmpty {
                        any = true;
                        self.print_slot(sink, slot)?;
                    }
                }
                if !any {
                    writeln!(sink, "<< empty imgStore >>")?;
                }
                Ok(None)
            }
            Listing::Structured => Ok(Some(ImageListing {
                images: self
                    .slots
                    .iter()
                    .filter(|s| s.is_valid == Validity::NonEmpty)
                    .map(|s| s.img_id.clone())
                    .collect(),
            })),
        }
    }

    fn print_header(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        writeln!(sink, "*****************************************")?;
        writeln!(sink, "**********IMGSTORE HEADER START**********")?;
        writeln!(sink, "VERSION: {}", self.header.version)?;
        writeln!(
            sink,
            "IMAGE COUNT: {}\t\tMAX IMAGES: {}",
            self.header.num_files, self.header.max_files
        )?;
        writeln!(
            sink,
            "THUMBNAIL: {} x {}\tSMALL: {} x {}",
            self.header.res_thumb.width, self.header.res_thumb.height, self.header.res_small.width, self.header.res_small.height
        )?;
        writeln!(sink, "***********IMGSTORE HEADER END***********")?;
        writeln!(sink, "*****************************************")
    }

    fn print_slot(&self, sink: &mut dyn Write, slot: &crate::layout::Slot) -> std::io::Result<()> {
        writeln!(sink, "IMAGE ID: {}", slot.img_id)?;
        writeln!(sink, "SHA: {}", hex::encode(slot.sha))?;
        writeln!(sink, "VALID: {}", slot.is_valid == Validity::NonEmpty)?;
        writeln!(
            sink,
            "OFFSET ORIG. : {}\t\tSIZE ORIG. : {}",
            slot.offset_of(Resolution::Orig),
            slot.size_of(Resolution::Orig)
        )?;
        writeln!(
            sink,
            "OFFSET THUMB.: {}\t\tSIZE THUMB.: {}",
            slot.offset_of(Resolution::Thumb),
            slot.size_of(Resolution::Thumb)
        )?;
        writeln!(
            sink,
            "OFFSET SMALL : {}\t\tSIZE SMALL : {}",
            slot.offset_of(Resolution::Small),
            slot.size_of(Resolution::Small)
        )?;
        writeln!(sink, "ORIGINAL: {} x {}", slot.res_orig.0, slot.res_orig.1)?;
        writeln!(sink, "*****************************************")
    }
}
