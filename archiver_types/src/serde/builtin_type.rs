use crate::registry::{Depth, TypeRegistry};
use crate::serde::{deser_array, deser_dictionary, deser_fixed_width, deser_str};
use crate::types::Value;
use crate::Result;

/// The identifiers that are decoded without consulting the registry.
///
/// These identifiers are reserved. A registry refuses procedures for them.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum BuiltinType {
    Int,
    UInt,
    Float,
    Double,
    Str,
    Array,
    Dictionary,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 7] = [
        BuiltinType::Int,
        BuiltinType::UInt,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Str,
        BuiltinType::Array,
        BuiltinType::Dictionary,
    ];

    pub const fn identifier(self) -> &'static str {
        match self {
            BuiltinType::Int => "Int",
            BuiltinType::UInt => "UInt",
            BuiltinType::Float => "Float",
            BuiltinType::Double => "Double",
            BuiltinType::Str => "String",
            BuiltinType::Array => "Array",
            BuiltinType::Dictionary => "Dictionary",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|typ| typ.identifier() == identifier)
    }

    /// Decodes the header and body that follow this type's identifier.
    /// `depth` is that of the value itself.
    pub fn decode(self, buf: &[u8], registry: &TypeRegistry, depth: Depth) -> Result<Value> {
        let val = match self {
            BuiltinType::Int => Value::Int(i64::from_le_bytes(deser_fixed_width(buf)?)),
            BuiltinType::UInt => Value::UInt(u64::from_le_bytes(deser_fixed_width(buf)?)),
            BuiltinType::Float => Value::Float(f32::from_le_bytes(deser_fixed_width(buf)?)),
            BuiltinType::Double => Value::Double(f64::from_le_bytes(deser_fixed_width(buf)?)),
            BuiltinType::Str => Value::Str(deser_str(buf)?),
            BuiltinType::Array => Value::Array(deser_array(buf, registry, depth)?),
            BuiltinType::Dictionary => Value::Dictionary(deser_dictionary(buf, registry, depth)?),
        };
        Ok(val)
    }
}
