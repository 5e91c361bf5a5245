use bytes::Bytes;
use serde::Serialize;

use crate::version::{self, FormatVersion};
use crate::writer::CompressionKind;

/// Footer information a caller already holds for a file.
///
/// Passing this to [`create_reader_with_meta`](crate::orc_file::create_reader_with_meta)
/// lets a reader skip reading and parsing the file tail. It is trusted as
/// given; nothing in it is checked against the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetaInfo {
    /// Compression of the footer and stream data
    pub compression: CompressionKind,
    /// Compression buffer size the file was written with
    pub buffer_size: usize,
    /// Serialized size of the file-level statistics section
    pub metadata_size: u64,
    /// Serialized footer, still compressed
    #[serde(skip)]
    pub footer: Bytes,
    /// Format version recorded in the postscript, as `[major, minor]`
    pub version_list: Vec<u32>,
}

impl FileMetaInfo {
    /// Registered version matching [`version_list`](Self::version_list), if any
    pub fn version(&self) -> Option<FormatVersion> {
        match self.version_list.as_slice() {
            [major, minor, ..] => version::by_numbers(*major, *minor),
            _ => None,
        }
    }

    /// Whether the file was written by a version newer than this crate knows
    pub fn is_from_future(&self) -> bool {
        match self.version_list.as_slice() {
            [major, minor, ..] => {
                let current = version::current();
                (*major, *minor) > (current.major(), current.minor())
            }
            _ => false,
        }
    }
}
