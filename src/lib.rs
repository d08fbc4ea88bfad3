//! # swf-reader
//!
//! A reader for Shockwave Flash (.swf) files.
//!
//! Validates the container signature, transparently inflates
//! zlib-compressed bodies, and walks the tag stream: the End and DoABC
//! tags are fully decoded, every other tag is skipped byte-for-byte.
//! (See the SWF file format specification,
//! <https://www.adobe.com/content/dam/acom/en/devnet/pdf/swf-file-format-spec.pdf>.)
pub mod swf;

// Re-export the main types for convenience
pub use swf::{
    Compression, DoAbcTag, Header, Parser, Rect, Result, Swf, SwfError, SwfReader, Tag,
    TAG_CODE_DO_ABC, TAG_CODE_END,
};
