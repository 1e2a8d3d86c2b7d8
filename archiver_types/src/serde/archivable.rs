use crate::{ArchiveError, Result};
use std::fmt;
use tracing::debug;

pub const MAX_IDENTIFIER_LEN: usize = u8::MAX as usize;

/// One contiguous piece of a header or a body.
pub type Chunk = Vec<u8>;

/// What to do with a collection member that cannot be encoded.
///
/// A member cannot be encoded when its identifier does not fit the `u8` length prefix.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum FilterPolicy {
    /// Leave the member out of the encoding.
    #[default]
    Drop,
    /// Abort the whole encoding with [`ArchiveError::NotEncodable`].
    Fail,
}

pub trait Archivable: fmt::Debug {
    fn identifier(&self) -> &str;

    /// Byte length of header plus body.
    fn payload_len(&self, policy: FilterPolicy) -> Result<usize>;

    fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>>;

    fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>>;

    /// Byte length of [`Self::encode_with()`]'s output, derived without encoding.
    fn encoded_len(&self, policy: FilterPolicy) -> Result<usize> {
        let id_len = checked_identifier_len(self.identifier())?;
        Ok(1 + id_len + self.payload_len(policy)?)
    }

    fn encode_with(&self, policy: FilterPolicy) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len(policy)?);
        write_identifier(self.identifier(), &mut buf)?;
        let header = self.header(policy)?;
        let body = self.body(policy)?;
        for chunk in header.iter().chain(body.iter()) {
            buf.extend_from_slice(chunk);
        }
        Ok(buf)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(FilterPolicy::default())
    }
}

pub fn checked_identifier_len(identifier: &str) -> Result<usize> {
    let len = identifier.len();
    if len > MAX_IDENTIFIER_LEN {
        return Err(ArchiveError::IdentifierTooLong {
            identifier: identifier.to_owned(),
            len,
        });
    }
    Ok(len)
}

pub fn write_identifier(identifier: &str, buf: &mut Vec<u8>) -> Result<()> {
    let len = checked_identifier_len(identifier)?;
    buf.push(len as u8);
    buf.extend_from_slice(identifier.as_bytes());
    Ok(())
}

/// Applies `policy` to one collection member. `Ok(false)` means leave it out.
pub fn admit(member: &dyn Archivable, policy: FilterPolicy) -> Result<bool> {
    let identifier = member.identifier();
    if identifier.len() <= MAX_IDENTIFIER_LEN {
        return Ok(true);
    }
    match policy {
        FilterPolicy::Drop => {
            debug!(
                identifier_len = identifier.len(),
                "Dropping a member whose identifier does not fit the prefix."
            );
            Ok(false)
        }
        FilterPolicy::Fail => Err(ArchiveError::NotEncodable(identifier.to_owned())),
    }
}
