use crate::byte_range;
use crate::registry::{Depth, TypeRegistry};
use crate::serde::{
    admit, ser_str, str_encoded_len, Archivable, BuiltinType, Chunk, FilterPolicy, LengthField,
    LENGTH_FIELD_WIDTH,
};
use crate::types::{Dictionary, Value};
use crate::{ArchiveError, Result};
use itertools::Itertools;
use tracing::debug;

/// The members of an ordered collection that survive a [`FilterPolicy`].
pub struct ArrayParts<'a> {
    elements: Vec<&'a dyn Archivable>,
}

impl<'a> ArrayParts<'a> {
    pub fn admit(
        elements: impl IntoIterator<Item = &'a dyn Archivable>,
        policy: FilterPolicy,
    ) -> Result<Self> {
        let mut kept = vec![];
        for elem in elements {
            if admit(elem, policy)? {
                kept.push(elem);
            }
        }
        Ok(Self { elements: kept })
    }

    pub fn payload_len(&self, policy: FilterPolicy) -> Result<usize> {
        let mut len = LENGTH_FIELD_WIDTH * (1 + self.elements.len());
        for elem in self.elements.iter() {
            len += elem.encoded_len(policy)?;
        }
        Ok(len)
    }

    pub fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        let mut header = Vec::with_capacity(1 + self.elements.len());
        header.push(LengthField::from(self.elements.len()).ser()?);
        for elem in self.elements.iter() {
            header.push(LengthField::from(elem.encoded_len(policy)?).ser()?);
        }
        Ok(header)
    }

    pub fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        self.elements
            .iter()
            .map(|elem| elem.encode_with(policy))
            .collect()
    }
}

/// The string-keyed pairs of a key-mapped collection that survive a [`FilterPolicy`].
///
/// Pairs are encoded in the order they are admitted.
pub struct MapParts<'a> {
    pairs: Vec<(&'a str, &'a dyn Archivable)>,
}

impl<'a> MapParts<'a> {
    pub fn admit(
        pairs: impl IntoIterator<Item = (&'a str, &'a dyn Archivable)>,
        policy: FilterPolicy,
    ) -> Result<Self> {
        let mut kept = vec![];
        for (key, val) in pairs {
            if admit(val, policy)? {
                kept.push((key, val));
            }
        }
        Ok(Self { pairs: kept })
    }

    pub fn payload_len(&self, policy: FilterPolicy) -> Result<usize> {
        let mut len = LENGTH_FIELD_WIDTH * (1 + self.pairs.len() * 2);
        for (key, val) in self.pairs.iter() {
            len += str_encoded_len(key)?;
            len += val.encoded_len(policy)?;
        }
        Ok(len)
    }

    pub fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        let mut header = Vec::with_capacity(1 + self.pairs.len() * 2);
        header.push(LengthField::from(self.pairs.len()).ser()?);
        for (key, _) in self.pairs.iter() {
            header.push(LengthField::from(str_encoded_len(key)?).ser()?);
        }
        for (_, val) in self.pairs.iter() {
            header.push(LengthField::from(val.encoded_len(policy)?).ser()?);
        }
        Ok(header)
    }

    pub fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        let mut body = Vec::with_capacity(self.pairs.len() * 2);
        for (key, _) in self.pairs.iter() {
            body.push(ser_str(key)?);
        }
        for (_, val) in self.pairs.iter() {
            body.push(val.encode_with(policy)?);
        }
        Ok(body)
    }
}

/// Elements whose identifier the registry does not know are left out.
pub fn deser_array(buf: &[u8], registry: &TypeRegistry, depth: Depth) -> Result<Vec<Value>> {
    let (count, rest) = LengthField::deser(buf)?;
    let (lens, rest) = LengthField::deser_many(rest, *count)?;
    let chunks = byte_range::split_into_parts(rest, &lens)?;

    let mut elements = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.into_iter().enumerate() {
        match registry.decode_at(chunk, depth.member())? {
            Some(val) => elements.push(val),
            None => debug!(index = i, "Dropping an array element of unknown type."),
        }
    }
    Ok(elements)
}

/// Key `i` is paired with value `i`.
/// A pair is left out as a whole if its key is not a string or its value is of unknown type.
pub fn deser_dictionary(
    buf: &[u8],
    registry: &TypeRegistry,
    depth: Depth,
) -> Result<Dictionary> {
    let (count, rest) = LengthField::deser(buf)?;
    let fields_count = count
        .checked_mul(2)
        .ok_or_else(|| ArchiveError::Malformed(format!("Pair count {} overflows", *count)))?;
    let (lens, rest) = LengthField::deser_many(rest, fields_count)?;
    let chunks = byte_range::split_into_parts(rest, &lens)?;
    let (key_chunks, val_chunks) = chunks.split_at(*count);

    let mut dict = Dictionary::new();
    for (i, (key_chunk, val_chunk)) in key_chunks.iter().zip_eq(val_chunks).enumerate() {
        let key = match registry.decode_at(key_chunk, depth.member())? {
            Some(Value::Str(key)) => key,
            _ => {
                debug!(index = i, "Dropping a pair whose key is not a string.");
                continue;
            }
        };
        match registry.decode_at(val_chunk, depth.member())? {
            Some(val) => {
                dict.insert(key, val);
            }
            None => debug!(%key, "Dropping a pair whose value is of unknown type."),
        }
    }
    Ok(dict)
}

impl Archivable for Vec<Value> {
    fn identifier(&self) -> &str {
        BuiltinType::Array.identifier()
    }
    fn payload_len(&self, policy: FilterPolicy) -> Result<usize> {
        ArrayParts::admit(self.iter().map(as_dyn), policy)?.payload_len(policy)
    }
    fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        ArrayParts::admit(self.iter().map(as_dyn), policy)?.header(policy)
    }
    fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        ArrayParts::admit(self.iter().map(as_dyn), policy)?.body(policy)
    }
}

impl Archivable for Dictionary {
    fn identifier(&self) -> &str {
        BuiltinType::Dictionary.identifier()
    }
    fn payload_len(&self, policy: FilterPolicy) -> Result<usize> {
        MapParts::admit(self.pairs(), policy)?.payload_len(policy)
    }
    fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        MapParts::admit(self.pairs(), policy)?.header(policy)
    }
    fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        MapParts::admit(self.pairs(), policy)?.body(policy)
    }
}

fn as_dyn(val: &Value) -> &dyn Archivable {
    val
}

impl Dictionary {
    fn pairs(&self) -> impl Iterator<Item = (&str, &dyn Archivable)> {
        self.iter().map(|(key, val)| (key.as_str(), as_dyn(val)))
    }
}
