//! SWF container parsing: header, frame rectangle, and the tag stream.

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use log::{debug, info, trace};

use super::compression;
use super::error::{Result, SwfError};
use super::models::{
    Compression, DoAbcTag, Header, Rect, Swf, Tag, TAG_CODE_DO_ABC, TAG_CODE_END,
};
use super::reader::SwfReader;

/// Byte offset where a compressed body begins: the 3 signature bytes,
/// the version byte, and the 4-byte declared file length.
const COMPRESSED_BODY_OFFSET: u64 = 8;

/// Reserved 6-bit length value escaping to a 32-bit long length.
const LONG_LENGTH_ESCAPE: u16 = 0x3f;

/// The byte source a [`Parser`] reads from: the raw input, or the
/// in-memory inflated body once compression has been resolved.
enum Source<R> {
    Raw(R),
    Inflated(Cursor<Vec<u8>>),
}

impl<R: Read> Read for Source<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Raw(src) => src.read(buf),
            Source::Inflated(body) => body.read(buf),
        }
    }
}

impl<R: Seek> Seek for Source<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Source::Raw(src) => src.seek(pos),
            Source::Inflated(body) => body.seek(pos),
        }
    }
}

/// Parser for a whole SWF file.
///
/// Owns the read cursor for the duration of one parse. The underlying
/// source is swapped for the inflated body at most once; after the swap
/// the raw input is dropped and never read again.
pub struct Parser<R> {
    reader: SwfReader<Source<R>>,
}

impl<R: Read + Seek> Parser<R> {
    /// Creates a parser over a seekable source positioned at offset 0.
    pub fn new(input: R) -> Self {
        Self {
            reader: SwfReader::new(Source::Raw(input)),
        }
    }

    /// Parses the entire file: header, then tags up to and including the
    /// End tag.
    pub fn parse(mut self) -> Result<Swf> {
        let header = self.parse_header()?;
        let tags = self.parse_tags()?;
        info!("Parsed SWF v{}: {} tags", header.version, tags.len());
        Ok(Swf { header, tags })
    }

    /// Parses the file header, leaving the cursor exactly at the start of
    /// the tag stream.
    ///
    /// # Errors
    /// - [`SwfError::MalformedSignature`] if the three signature bytes do
    ///   not spell a recognized SWF signature.
    /// - [`SwfError::UnsupportedCompression`] for an LZMA signature.
    /// - [`SwfError::UnexpectedEof`] if the input ends anywhere inside
    ///   the header; every header field is mandatory.
    pub fn parse_header(&mut self) -> Result<Header> {
        let first = self.reader.read_u8().map_err(SwfError::required)?;
        let compression = match Compression::from_signature(first) {
            Some(Compression::Lzma) => {
                return Err(SwfError::UnsupportedCompression(Compression::Lzma))
            }
            Some(mode) => mode,
            None => return Err(SwfError::MalformedSignature { found: first }),
        };
        let second = self.reader.read_u8().map_err(SwfError::required)?;
        if second != b'W' {
            return Err(SwfError::MalformedSignature { found: second });
        }
        let third = self.reader.read_u8().map_err(SwfError::required)?;
        if third != b'S' {
            return Err(SwfError::MalformedSignature { found: third });
        }

        let version = self.reader.read_u8().map_err(SwfError::required)?;
        let file_length = self.reader.read_u32().map_err(SwfError::required)?;

        if compression == Compression::Zlib {
            self.inflate_body()?;
        }

        let frame_size = self.parse_rect().map_err(SwfError::required)?;
        let frame_rate = self.reader.read_fixed8().map_err(SwfError::required)?;
        let frame_count = self.reader.read_u16().map_err(SwfError::required)?;

        debug!(
            "Header parsed: compression={:?}, version={}, {} frames at {} fps",
            compression, version, frame_count, frame_rate
        );
        Ok(Header {
            compression,
            version,
            file_length,
            frame_size,
            frame_rate,
            frame_count,
        })
    }

    /// Seeks past the fixed header prefix, inflates the rest of the raw
    /// input into memory, and reseats the cursor over the inflated body.
    fn inflate_body(&mut self) -> Result<()> {
        debug!("Compressed body detected, inflating");
        self.reader.seek(SeekFrom::Start(COMPRESSED_BODY_OFFSET))?;
        let body = compression::inflate(self.reader.get_mut())?;
        self.reader = SwfReader::new(Source::Inflated(Cursor::new(body)));
        Ok(())
    }

    /// Parses a frame rectangle record.
    ///
    /// The five leading bits give the width of the four signed bounds. A
    /// width of zero is accepted and leaves all bounds at zero.
    pub fn parse_rect(&mut self) -> Result<Rect> {
        let n_bits = self.reader.read_unsigned_bits(5)? as u8;
        let mut rect = Rect {
            n_bits,
            ..Rect::default()
        };
        if n_bits == 0 {
            return Ok(rect);
        }
        rect.x_min = self.read_bound(n_bits)?;
        rect.x_max = self.read_bound(n_bits)?;
        rect.y_min = self.read_bound(n_bits)?;
        rect.y_max = self.read_bound(n_bits)?;
        Ok(rect)
    }

    /// Reads one rect bound. The record is already begun, so a clean end
    /// of input here is a truncation.
    fn read_bound(&mut self, n_bits: u8) -> Result<i32> {
        self.reader.read_signed_bits(n_bits).map_err(SwfError::required)
    }

    /// Parses tags until the End tag has been produced; it is appended
    /// before the loop stops, and bytes following it are never read.
    pub fn parse_tags(&mut self) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        loop {
            if let Some(tag) = self.parse_tag()? {
                let finished = tag.code() == TAG_CODE_END;
                tags.push(tag);
                if finished {
                    break;
                }
            }
        }
        Ok(tags)
    }

    /// Parses a single tag header and dispatches on its code.
    ///
    /// Returns `None` for tags with no registered decoder; their declared
    /// payload is discarded byte-for-byte.
    pub fn parse_tag(&mut self) -> Result<Option<Tag>> {
        let code_and_length = self.reader.read_u16().map_err(SwfError::required)?;
        let code = (code_and_length >> 6) & 0x3ff;
        let short_length = code_and_length & LONG_LENGTH_ESCAPE;
        let length = if short_length == LONG_LENGTH_ESCAPE {
            self.reader.read_u32().map_err(SwfError::required)?
        } else {
            u32::from(short_length)
        };

        match code {
            TAG_CODE_END => Ok(Some(Tag::End { length })),
            TAG_CODE_DO_ABC => {
                let tag = self.parse_do_abc(length).map_err(SwfError::required)?;
                Ok(Some(tag))
            }
            _ => {
                trace!("Skipping tag {} ({} bytes)", code, length);
                self.reader.skip(u64::from(length))?;
                Ok(None)
            }
        }
    }

    /// Decodes a DoABC tag: a flags word, the NUL-terminated unit name,
    /// then the rest of the declared length as opaque bytecode.
    fn parse_do_abc(&mut self, length: u32) -> Result<Tag> {
        let begin = self.reader.position()?;
        let flags = self.reader.read_u32()?;
        let name = self.reader.read_string()?;
        let end = self.reader.position()?;

        // What remains of the declared length after the fields just read
        // is the bytecode blob. A length too small to cover them means
        // the payload was cut short.
        let consumed = (end - begin) as u32;
        let data_len = length.checked_sub(consumed).ok_or(SwfError::UnexpectedEof)?;
        let mut data = vec![0u8; data_len as usize];
        self.reader.read_exact(&mut data)?;

        debug!("DoABC tag '{}': {} bytes of bytecode", name, data.len());
        Ok(Tag::DoAbc(DoAbcTag {
            length,
            flags,
            name,
            data,
        }))
    }
}

impl Swf {
    /// Parses an entire SWF file from a seekable source positioned at
    /// offset 0.
    pub fn parse<R: Read + Seek>(input: R) -> Result<Swf> {
        Parser::new(input).parse()
    }
}
