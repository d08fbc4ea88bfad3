//! Custom error types for the swf-reader crate.

use thiserror::Error;

use super::models::Compression;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum SwfError {
    /// An error originating from I/O operations, including decompression
    /// of the file body.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The input ended cleanly: zero bytes were available at a point
    /// where a new read could legitimately begin.
    #[error("end of input")]
    EndOfStream,

    /// The input ended inside a field or record that was already begun,
    /// or at a position where the next field is mandatory.
    #[error("unexpected end of input: truncated field or record")]
    UnexpectedEof,

    /// The three signature bytes do not spell a recognized SWF signature.
    #[error("malformed header: unexpected signature byte {found:#04x}")]
    MalformedSignature { found: u8 },

    /// The signature declares a compression scheme this crate does not
    /// implement.
    #[error("unsupported compression scheme: {0:?}")]
    UnsupportedCompression(Compression),

    /// A bit-field read was requested with a width outside 1..=32.
    /// A caller contract violation, independent of the input.
    #[error("bit field width must be between 1 and 32, got {0}")]
    InvalidBitWidth(u8),
}

impl SwfError {
    /// Reclassifies a clean end of input as a truncation.
    ///
    /// Applied wherever the surrounding record has already been begun, so
    /// running out of bytes can no longer be a clean stop.
    pub(crate) fn required(self) -> SwfError {
        match self {
            SwfError::EndOfStream => SwfError::UnexpectedEof,
            other => other,
        }
    }
}

/// A convenience `Result` type alias using the crate's `SwfError` type.
pub type Result<T> = std::result::Result<T, SwfError>;
