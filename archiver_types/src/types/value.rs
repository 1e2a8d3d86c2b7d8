use crate::serde::{Archivable, BuiltinType, Chunk, FilterPolicy};
use crate::types::{Aggregate, Dictionary, Record};
use crate::Result;

/// A decoded value whose concrete type is known only at runtime.
///
/// Aggregates that were reconstructed during decoding are held as [`Value::Record`]
/// and can be recovered with [`Value::downcast_ref()`] or [`Value::into_record()`].
#[derive(PartialEq, Clone, Debug)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Str(String),
    Array(Vec<Value>),
    Dictionary(Dictionary),
    Record(Box<dyn Record>),
}

impl Value {
    pub fn record<T: Aggregate>(agg: T) -> Self {
        Self::Record(Box::new(agg))
    }

    /// `None` for aggregates.
    pub fn builtin_type(&self) -> Option<BuiltinType> {
        let typ = match self {
            Value::Int(_) => BuiltinType::Int,
            Value::UInt(_) => BuiltinType::UInt,
            Value::Float(_) => BuiltinType::Float,
            Value::Double(_) => BuiltinType::Double,
            Value::Str(_) => BuiltinType::Str,
            Value::Array(_) => BuiltinType::Array,
            Value::Dictionary(_) => BuiltinType::Dictionary,
            Value::Record(_) => return None,
        };
        Some(typ)
    }

    fn as_archivable(&self) -> &dyn Archivable {
        match self {
            Value::Int(i) => i,
            Value::UInt(u) => u,
            Value::Float(f) => f,
            Value::Double(d) => d,
            Value::Str(s) => s,
            Value::Array(elems) => elems,
            Value::Dictionary(dict) => dict,
            Value::Record(rec) => rec.as_archivable(),
        }
    }
}

/* Accessors. */
impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(u) => Some(*u),
            _ => None,
        }
    }
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elems) => Some(elems),
            _ => None,
        }
    }
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Aggregate>(&self) -> Option<&T> {
        match self {
            Value::Record(rec) => rec.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
    pub fn into_record<T: Aggregate>(self) -> Option<T> {
        match self {
            Value::Record(rec) => rec.into_any().downcast::<T>().ok().map(|agg| *agg),
            _ => None,
        }
    }
}

impl Archivable for Value {
    fn identifier(&self) -> &str {
        self.as_archivable().identifier()
    }
    fn payload_len(&self, policy: FilterPolicy) -> Result<usize> {
        self.as_archivable().payload_len(policy)
    }
    fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        self.as_archivable().header(policy)
    }
    fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        self.as_archivable().body(policy)
    }
}

/* Conversions. */
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}
impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::UInt(u)
    }
}
impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float(f)
    }
}
impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}
impl From<Vec<Value>> for Value {
    fn from(elems: Vec<Value>) -> Self {
        Self::Array(elems)
    }
}
impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Self::Dictionary(dict)
    }
}
