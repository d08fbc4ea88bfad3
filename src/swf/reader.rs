//! Low-level reading of the basic data types defined by the SWF
//! specification.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

use super::error::{Result, SwfError};

/// A read cursor serving both whole-byte and bit-packed reads over a
/// byte source.
///
/// Bit-packed fields are read most-significant-bit first and may cross
/// byte boundaries. Any byte-oriented operation or seek first discards
/// partial-bit state by advancing to the next byte boundary.
///
/// Reads that find zero bytes available report [`SwfError::EndOfStream`];
/// reads that consumed part of what they needed report
/// [`SwfError::UnexpectedEof`].
pub struct SwfReader<R> {
    src: R,
    /// The byte currently being consumed bit by bit.
    bit_buf: u8,
    /// Bits of `bit_buf` not yet consumed (0 means byte-aligned).
    bit_count: u8,
}

impl<R> SwfReader<R> {
    /// Wraps a byte source, starting byte-aligned at its current offset.
    pub fn new(src: R) -> Self {
        Self {
            src,
            bit_buf: 0,
            bit_count: 0,
        }
    }

    /// Discards any partially consumed byte, resuming at the next byte
    /// boundary.
    pub fn align(&mut self) {
        self.bit_count = 0;
    }

    /// Gives access to the underlying source. The cursor should be
    /// byte-aligned before the source is read or repositioned directly.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.src
    }
}

impl<R: Read> SwfReader<R> {
    /// Reads one byte from the source, bypassing the bit buffer.
    fn next_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.src.read(&mut buf) {
                Ok(0) => return Err(SwfError::EndOfStream),
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Fills `buf` completely, re-aligning to a byte boundary first.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.align();
        let mut filled = 0;
        while filled < buf.len() {
            match self.src.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(if filled == 0 {
                        SwfError::EndOfStream
                    } else {
                        SwfError::UnexpectedEof
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Discards exactly `n` bytes without interpreting them.
    ///
    /// Fewer than `n` bytes remaining is a truncation, whatever the
    /// remaining count.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.align();
        let copied = io::copy(&mut self.src.by_ref().take(n), &mut io::sink())?;
        if copied < n {
            return Err(SwfError::UnexpectedEof);
        }
        Ok(())
    }

    /// Consumes exactly `n` bits, most significant first. The width must
    /// already be validated to be at most 32.
    fn read_bits(&mut self, n: u8) -> Result<u32> {
        let mut value: u32 = 0;
        let mut remaining = n;
        while remaining > 0 {
            if self.bit_count == 0 {
                self.bit_buf = match self.next_byte() {
                    Ok(byte) => byte,
                    // Partway through the field, running dry is a truncation.
                    Err(SwfError::EndOfStream) if remaining < n => {
                        return Err(SwfError::UnexpectedEof)
                    }
                    Err(e) => return Err(e),
                };
                self.bit_count = 8;
            }
            let take = remaining.min(self.bit_count);
            let shift = self.bit_count - take;
            let mask = ((1u16 << take) - 1) as u8;
            value = (value << take) | u32::from((self.bit_buf >> shift) & mask);
            self.bit_count -= take;
            remaining -= take;
        }
        Ok(value)
    }

    /// Reads an unsigned bit field of `n` bits.
    ///
    /// # Errors
    /// Returns [`SwfError::InvalidBitWidth`] for widths outside 1..=32,
    /// independent of the remaining input.
    pub fn read_unsigned_bits(&mut self, n: u8) -> Result<u32> {
        if n == 0 || n > 32 {
            return Err(SwfError::InvalidBitWidth(n));
        }
        self.read_bits(n)
    }

    /// Reads a signed bit field of `n` bits.
    ///
    /// Bit `n - 1` is the sign bit; when set, the value is sign-extended
    /// to a full 32-bit two's-complement integer.
    pub fn read_signed_bits(&mut self, n: u8) -> Result<i32> {
        let value = self.read_unsigned_bits(n)?;
        // For n == 32 the raw value already carries the sign bit.
        if n < 32 && (value >> (n - 1)) & 1 == 1 {
            return Ok((value | (u32::MAX << n)) as i32);
        }
        Ok(value as i32)
    }

    /// Reads a single unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a single signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads an unsigned 16-bit little-endian integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    /// Reads a signed 16-bit little-endian integer.
    pub fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_i16(&buf))
    }

    /// Reads an unsigned 32-bit little-endian integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    /// Reads a signed 32-bit little-endian integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_i32(&buf))
    }

    /// Reads a variable-length encoded unsigned 32-bit integer.
    ///
    /// The low 7 bits of each byte contribute at an increasing shift; the
    /// high bit continues to the next byte. At most 4 bytes are consumed,
    /// regardless of the final byte's continuation bit.
    pub fn read_encoded_u32(&mut self) -> Result<u32> {
        self.align();
        let mut value: u32 = 0;
        let mut count: u32 = 0;
        loop {
            let byte = match self.next_byte() {
                Ok(byte) => byte,
                Err(SwfError::EndOfStream) if count != 0 => return Err(SwfError::UnexpectedEof),
                Err(e) => return Err(e),
            };
            value |= u32::from(byte & 0x7f) << (count * 7);
            count += 1;
            if count == 4 || byte & 0x80 == 0 {
                break;
            }
        }
        Ok(value)
    }

    /// Reads a 16.16 fixed-point number: fractional u16, then integer
    /// u16.
    pub fn read_fixed(&mut self) -> Result<f32> {
        let fraction = self.read_u16()?;
        let integer = self.read_u16().map_err(SwfError::required)?;
        Ok(f32::from(integer) + f32::from(fraction) / 65536.0)
    }

    /// Reads an 8.8 fixed-point number: fractional u8, then signed
    /// integer i8.
    ///
    /// The fractional contribution follows the sign of the integer part;
    /// an integer part of zero counts as non-negative.
    pub fn read_fixed8(&mut self) -> Result<f32> {
        let fraction = self.read_u8()?;
        let integer = self.read_i8().map_err(SwfError::required)?;
        if integer < 0 {
            Ok(f32::from(integer) - f32::from(fraction) / 256.0)
        } else {
            Ok(f32::from(integer) + f32::from(fraction) / 256.0)
        }
    }

    /// Reads a NUL-terminated string. The terminator is consumed but not
    /// included; invalid UTF-8 is replaced lossily.
    pub fn read_string(&mut self) -> Result<String> {
        self.align();
        let mut bytes = Vec::new();
        loop {
            let byte = match self.next_byte() {
                Ok(byte) => byte,
                Err(SwfError::EndOfStream) if !bytes.is_empty() => {
                    return Err(SwfError::UnexpectedEof)
                }
                Err(e) => return Err(e),
            };
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<R: Seek> SwfReader<R> {
    /// Moves the cursor. Seeking first discards partial-bit state.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.align();
        Ok(self.src.seek(pos)?)
    }

    /// The current byte position. Implies alignment, like any seek.
    pub fn position(&mut self) -> Result<u64> {
        self.seek(SeekFrom::Current(0))
    }
}
