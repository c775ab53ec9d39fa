//! Favicon fetching and hashing.
//!
//! Provides Shodan-compatible MurmurHash3 favicon hashing and bounded favicon
//! download. The hash format matches Shodan's `http.favicon.hash` field, so
//! hashes can be matched against public fingerprint databases and used as
//! search pivots directly.

mod fetch;
mod hash;

pub use fetch::{FaviconFetcher, FetchOutcome, HttpFetcher};
pub use hash::{encode_mime_base64, favicon_hash};
