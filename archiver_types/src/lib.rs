//! A self-describing binary archive format.
//!
//! Values are encoded as `identifier ++ header ++ body`; see [`serde`] for the layout.
//! Decoding needs no schema: the identifier selects how to read the rest.

pub mod byte_range;
mod error;
pub mod registry;
pub mod serde;
pub mod types;

pub use error::*;

use crate::serde::{Archivable, FilterPolicy};
use crate::types::Value;

/// Encodes `val`, leaving out collection members that cannot be encoded.
pub fn encode(val: &dyn Archivable) -> Result<Vec<u8>> {
    val.encode_with(FilterPolicy::Drop)
}

pub fn encode_with(val: &dyn Archivable, policy: FilterPolicy) -> Result<Vec<u8>> {
    val.encode_with(policy)
}

/// Decodes using the process-wide registry. `Ok(None)` means the identifier is unknown.
pub fn decode(buf: &[u8]) -> Result<Option<Value>> {
    registry::decode(buf)
}
