//! Content-encoding removal
//!
//! Stored artifacts are always the raw package bytes, whatever the transport
//! encoding was.

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use std::io::Read;
use vsixget_errors::TransferError;

/// Decode a complete body according to its `Content-Encoding`
///
/// Supports `gzip`, `x-gzip`, `deflate` (zlib-wrapped, falling back to raw
/// deflate) and `identity`. Anything else is rejected.
///
/// # Errors
///
/// Returns `TransferError::Decode` for unsupported encodings or corrupt data.
pub fn decode_body(encoding: Option<&str>, body: Vec<u8>) -> Result<Vec<u8>, TransferError> {
    let encoding = encoding.map(|e| e.trim().to_ascii_lowercase()).unwrap_or_default();
    match encoding.as_str() {
        "" | "identity" => Ok(body),
        "gzip" | "x-gzip" => read_all(MultiGzDecoder::new(body.as_slice()), &encoding),
        "deflate" => read_all(ZlibDecoder::new(body.as_slice()), &encoding)
            .or_else(|_| read_all(DeflateDecoder::new(body.as_slice()), &encoding)),
        other => Err(TransferError::Decode {
            encoding: other.to_string(),
            message: "unsupported content encoding".to_string(),
        }),
    }
}

fn read_all(mut reader: impl Read, encoding: &str) -> Result<Vec<u8>, TransferError> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| TransferError::Decode {
            encoding: encoding.to_string(),
            message: e.to_string(),
        })?;
    Ok(out)
}
