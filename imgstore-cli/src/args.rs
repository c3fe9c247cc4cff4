use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line client for the imgstore image database
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct App {
    /// Path to the imgstore file to operate on
    pub path: PathBuf,

    /// Command to run against the store
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Creates a new, empty store
    Create {
        /// Maximum number of images the store can ever hold
        #[arg(long = "max_files")]
        max_files: Option<u32>,

        /// Maximum thumbnail width/height, in pixels
        #[arg(long = "thumb_res", num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
        thumb_res: Option<Vec<u16>>,

        /// Maximum small-variant width/height, in pixels
        #[arg(long = "small_res", num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
        small_res: Option<Vec<u16>>,
    },
    /// Lists every image currently in the store
    List {
        /// Print the listing as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Inserts an image under the given id
    Insert {
        /// Identifier to insert the image under
        id: String,
        /// Path to the JPEG file to insert
        file: PathBuf,
    },
    /// Reads an image out of the store, writing it to `<id>_<resolution>.jpg`
    Read {
        /// Identifier of the image to read
        id: String,
        /// Which variant to read: thumb, small, or orig
        #[arg(default_value = "orig")]
        resolution: String,
    },
    /// Deletes an image from the store
    Delete {
        /// Identifier of the image to delete
        id: String,
    },
    /// Reclaims space used by deleted images by rewriting the store into
    /// `tmp_path` and replacing the store with the result
    Gc {
        /// Scratch path to rewrite into before replacing the store; must be
        /// on the same filesystem as the store's path
        tmp_path: PathBuf,
    },
}
