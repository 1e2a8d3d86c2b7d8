use crate::byte_range;
use crate::serde::{write_identifier, BuiltinType, Chunk};
use crate::{ArchiveError, Result};
use derive_more::{Deref, From};
use std::mem;

const LENGTH_FIELD_TYPE: BuiltinType = BuiltinType::Int;

/// Byte width of every [`LengthField`]: a `u8` prefix, `"Int"`, and an `i64`.
pub const LENGTH_FIELD_WIDTH: usize =
    1 + LENGTH_FIELD_TYPE.identifier().len() + mem::size_of::<i64>();

/// A count or a byte length recorded in a header.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct LengthField(usize);

impl LengthField {
    pub fn ser(&self) -> Result<Chunk> {
        let int = i64::try_from(self.0)
            .map_err(|_| ArchiveError::Malformed(format!("Length {} overflows i64", self.0)))?;

        let mut buf = Vec::with_capacity(LENGTH_FIELD_WIDTH);
        write_identifier(LENGTH_FIELD_TYPE.identifier(), &mut buf)?;
        buf.extend_from_slice(&int.to_le_bytes());
        Ok(buf)
    }

    /// Reads one field off the front of `buf`; returns it and the rest.
    pub fn deser(buf: &[u8]) -> Result<(Self, &[u8])> {
        let (field, rest) = byte_range::split(buf, LENGTH_FIELD_WIDTH)?;
        let (prefix, int_buf) = field.split_at(LENGTH_FIELD_WIDTH - mem::size_of::<i64>());

        let identifier = LENGTH_FIELD_TYPE.identifier().as_bytes();
        if prefix[0] as usize != identifier.len() || &prefix[1..] != identifier {
            return Err(ArchiveError::Malformed(format!(
                "Length field is not tagged {:?}. {prefix:?}",
                LENGTH_FIELD_TYPE.identifier()
            )));
        }

        let mut int_bytes = [0u8; mem::size_of::<i64>()];
        int_bytes.copy_from_slice(int_buf);
        let int = i64::from_le_bytes(int_bytes);
        let len = usize::try_from(int)
            .map_err(|_| ArchiveError::Malformed(format!("Negative length {int}")))?;

        Ok((Self(len), rest))
    }

    /// Reads `count` consecutive fields off the front of `buf`.
    pub fn deser_many(buf: &[u8], count: usize) -> Result<(Vec<usize>, &[u8])> {
        let fields_len = count.checked_mul(LENGTH_FIELD_WIDTH).ok_or_else(|| {
            ArchiveError::Malformed(format!("Count {count} overflows the header length"))
        })?;
        let (fields, rest) = byte_range::split(buf, fields_len)?;

        let mut lens = Vec::with_capacity(count);
        let mut fields = fields;
        while !fields.is_empty() {
            let (len, latter) = Self::deser(fields)?;
            lens.push(*len);
            fields = latter;
        }
        Ok((lens, rest))
    }
}
