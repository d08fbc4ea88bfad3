//! Decompression of compressed SWF bodies.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::debug;

use super::error::Result;

/// Inflates a zlib stream from the source's current position to its end.
///
/// Failures to read or inflate surface as the underlying I/O error,
/// unchanged.
pub fn inflate(src: &mut impl Read) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(src);
    let mut body = Vec::new();
    decoder.read_to_end(&mut body)?;
    debug!("Inflated compressed body: {} bytes", body.len());
    Ok(body)
}
