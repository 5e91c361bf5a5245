/// Errors that can occur while opening a file for reading
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error, passed through unchanged
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The file does not start with the format's magic bytes
    #[error("Not an ORC file: {0}")]
    NotAnOrcFile(String),

    /// The file is damaged or truncated
    #[error("Malformed file: {0}")]
    Malformed(String),
}
