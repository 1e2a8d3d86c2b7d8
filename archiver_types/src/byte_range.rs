//! Slicing helpers that every decode path goes through.
//!
//! Reading past the end of a buffer is reported as [`ArchiveError::OutOfBounds`], never truncated.

use crate::{ArchiveError, Result};


/// Splits `buf` into `buf[..offset]` and `buf[offset..]`.
pub fn split(buf: &[u8], offset: usize) -> Result<(&[u8], &[u8])> {
    if offset > buf.len() {
        return Err(ArchiveError::OutOfBounds {
            needed: offset,
            remaining: buf.len(),
        });
    }
    Ok(buf.split_at(offset))
}

/// Cuts consecutive parts of the given `lengths` off the front of `buf`.
///
/// Bytes following the last part are ignored.
pub fn split_into_parts<'a>(buf: &'a [u8], lengths: &[usize]) -> Result<Vec<&'a [u8]>> {
    let mut parts = Vec::with_capacity(lengths.len());
    let mut rest = buf;
    for len in lengths {
        let (part, latter) = split(rest, *len)?;
        parts.push(part);
        rest = latter;
    }
    Ok(parts)
}
