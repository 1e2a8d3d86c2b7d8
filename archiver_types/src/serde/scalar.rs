use crate::byte_range;
use crate::serde::{
    checked_identifier_len, write_identifier, Archivable, BuiltinType, Chunk, FilterPolicy,
    LengthField, LENGTH_FIELD_WIDTH,
};
use crate::Result;
use std::mem;
use std::str;
use tracing::debug;

macro_rules! impl_fixed_width_scalar {
    ($typ:ty, $builtin:expr) => {
        impl Archivable for $typ {
            fn identifier(&self) -> &str {
                $builtin.identifier()
            }
            fn payload_len(&self, _policy: FilterPolicy) -> Result<usize> {
                Ok(mem::size_of::<$typ>())
            }
            fn header(&self, _policy: FilterPolicy) -> Result<Vec<Chunk>> {
                Ok(vec![])
            }
            fn body(&self, _policy: FilterPolicy) -> Result<Vec<Chunk>> {
                Ok(vec![self.to_le_bytes().to_vec()])
            }
        }
    };
}

impl_fixed_width_scalar!(i64, BuiltinType::Int);
impl_fixed_width_scalar!(u64, BuiltinType::UInt);
impl_fixed_width_scalar!(f32, BuiltinType::Float);
impl_fixed_width_scalar!(f64, BuiltinType::Double);

/// Reads exactly `LEN` bytes off the front of `buf`. Any bytes after them are ignored.
pub fn deser_fixed_width<const LEN: usize>(buf: &[u8]) -> Result<[u8; LEN]> {
    let (former, _) = byte_range::split(buf, LEN)?;
    let mut bytes = [0u8; LEN];
    bytes.copy_from_slice(former);
    Ok(bytes)
}

/* Strings. Map keys are encoded through these without owning a `String`. */

pub fn str_payload_len(s: &str) -> usize {
    LENGTH_FIELD_WIDTH + s.len()
}

pub fn str_encoded_len(s: &str) -> Result<usize> {
    let id_len = checked_identifier_len(BuiltinType::Str.identifier())?;
    Ok(1 + id_len + str_payload_len(s))
}

pub fn ser_str(s: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(str_encoded_len(s)?);
    write_identifier(BuiltinType::Str.identifier(), &mut buf)?;
    buf.extend_from_slice(&LengthField::from(s.len()).ser()?);
    buf.extend_from_slice(s.as_bytes());
    Ok(buf)
}

/// Text that is not valid UTF-8 is read as the empty string.
pub fn deser_str(buf: &[u8]) -> Result<String> {
    let (len, rest) = LengthField::deser(buf)?;
    let (text, _) = byte_range::split(rest, *len)?;
    match str::from_utf8(text) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => {
            debug!(%e, "String body is not UTF-8. Substituting the empty string.");
            Ok(String::new())
        }
    }
}

impl Archivable for String {
    fn identifier(&self) -> &str {
        BuiltinType::Str.identifier()
    }
    fn payload_len(&self, _policy: FilterPolicy) -> Result<usize> {
        Ok(str_payload_len(self))
    }
    fn header(&self, _policy: FilterPolicy) -> Result<Vec<Chunk>> {
        Ok(vec![LengthField::from(self.len()).ser()?])
    }
    fn body(&self, _policy: FilterPolicy) -> Result<Vec<Chunk>> {
        Ok(vec![self.as_bytes().to_vec()])
    }
    fn encode_with(&self, _policy: FilterPolicy) -> Result<Vec<u8>> {
        ser_str(self)
    }
}
