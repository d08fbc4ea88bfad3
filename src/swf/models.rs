//! Data structures representing SWF format components

/// Tag code of the End tag terminating the tag stream.
pub const TAG_CODE_END: u16 = 0;

/// Tag code of the DoABC tag carrying ActionScript 3 bytecode.
pub const TAG_CODE_DO_ABC: u16 = 82;

/// Body compression scheme, declared by the first signature byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Zlib,
    /// Recognized but not implemented; selecting it fails the parse.
    Lzma,
}

impl Compression {
    /// Maps the first signature byte to its compression scheme.
    pub fn from_signature(byte: u8) -> Option<Self> {
        match byte {
            b'F' => Some(Compression::None),
            b'C' => Some(Compression::Zlib),
            b'Z' => Some(Compression::Lzma),
            _ => None,
        }
    }
}

/// A fully parsed SWF file: header plus the ordered tag sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Swf {
    pub header: Header,
    pub tags: Vec<Tag>,
}

/// Parsed SWF file header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub compression: Compression,
    pub version: u8,
    /// Declared total file length. Informational; not re-validated
    /// against the actual body.
    pub file_length: u32,
    pub frame_size: Rect,
    pub frame_rate: f32,
    pub frame_count: u16,
}

/// A frame rectangle record.
///
/// The four bounds are sign-extended from `n_bits`-wide fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Bit width used to encode each of the four bounds.
    pub n_bits: u8,
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

/// A decoded tag from the body stream.
///
/// Only the End and DoABC tags are decoded. Every other tag is skipped
/// byte-for-byte during parsing and never materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Stream terminator (code 0, empty payload).
    End { length: u32 },
    /// DoABC tag carrying ActionScript 3 bytecode.
    DoAbc(DoAbcTag),
}

impl Tag {
    /// The tag code as it appeared on the wire.
    pub fn code(&self) -> u16 {
        match self {
            Tag::End { .. } => TAG_CODE_END,
            Tag::DoAbc(_) => TAG_CODE_DO_ABC,
        }
    }

    /// The declared payload length in bytes.
    pub fn length(&self) -> u32 {
        match self {
            Tag::End { length } => *length,
            Tag::DoAbc(tag) => tag.length,
        }
    }
}

/// Payload of a DoABC tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoAbcTag {
    /// Declared payload length of the whole tag.
    pub length: u32,
    pub flags: u32,
    /// Logical name of the bytecode unit.
    pub name: String,
    /// The ActionScript bytecode, kept as an opaque blob.
    pub data: Vec<u8>,
}
