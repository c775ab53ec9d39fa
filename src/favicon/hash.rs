//! Shodan-compatible favicon hashing.
//!
//! Shodan and the public favicon fingerprint databases hash the MIME base64
//! text of the favicon (76-character lines, each terminated by `\n`) with
//! MurmurHash3 x86_32, seed 0, stored as a signed integer. Hashes are only
//! comparable with those databases if this exact transform is applied.

use base64::Engine;

/// Raw bytes per encoded line: 57 bytes encode to exactly 76 base64 characters.
const MIME_LINE_BYTES: usize = 57;

/// Computes the fingerprint hash of raw favicon bytes.
///
/// Deterministic and side-effect free. Empty input hashes to 0, which is why
/// hash 0 usually means "empty favicon" rather than a real technology.
pub fn favicon_hash(raw_bytes: &[u8]) -> i32 {
    let encoded = encode_mime_base64(raw_bytes);
    let hash = murmurhash3::murmurhash3_x86_32(encoded.as_bytes(), 0);
    // Reinterpret the u32 bits as i32 (Shodan stores as signed integer)
    hash as i32
}

/// Encodes bytes the way Python's `base64.encodebytes` does.
///
/// Every line, including the last partial one, ends with `\n`, and empty
/// input produces an empty string.
pub fn encode_mime_base64(raw_bytes: &[u8]) -> String {
    let engine = &base64::engine::general_purpose::STANDARD;
    let lines = raw_bytes.len().div_ceil(MIME_LINE_BYTES);
    let mut encoded = String::with_capacity(lines * 77);
    for chunk in raw_bytes.chunks(MIME_LINE_BYTES) {
        engine.encode_string(chunk, &mut encoded);
        encoded.push('\n');
    }
    encoded
}
