//! # Serialization format
//!
//! Every encodable value implements [`Archivable`].
//!
//! The below pseudocode depicts the encoded representations.
//!
//! They all start with `identifier`, a UTF-8 type name prefixed by its byte length in `u8`.
//! Hence an identifier is at most 255 bytes long.
//!
//! Lengths recorded in a header are `length_field`s, which are complete encodings of
//! [`BuiltinType::Int`]. Every `length_field` is therefore [`LENGTH_FIELD_WIDTH`] bytes long
//! regardless of the host's pointer width.
//!
//! Scalars are encoded in little-endian.
//!
//! ```text
//! struct length_field {
//!     identifier_len:     u8 = 3,
//!     identifier:         [u8; 3] = "Int",
//!     body:               i64,
//! }
//!
//! struct Int or UInt or Double {
//!     identifier_len:     u8,
//!     identifier:         [u8; identifier_len],
//!     body:               [u8; 8],
//! }
//!
//! struct Float {
//!     identifier_len:     u8,
//!     identifier:         [u8; identifier_len],
//!     body:               [u8; 4],
//! }
//!
//! struct String {
//!     identifier_len:     u8,
//!     identifier:         [u8; identifier_len],
//!     header:             length_field,
//!     body:               [u8; header],
//! }
//!
//! struct Array {
//!     identifier_len:     u8,
//!     identifier:         [u8; identifier_len],
//!     header:         {
//!         count:              length_field,
//!         element_0_len:      length_field,
//!         ...
//!     },
//!     body:           {
//!         element_0:          Int or ... or Array or Dictionary or aggregate,
//!         ...
//!     },
//! }
//!
//! struct Dictionary or aggregate {
//!     identifier_len:     u8,
//!     identifier:         [u8; identifier_len],
//!     header:         {
//!         count:              length_field,
//!         key_0_len:          length_field,
//!         ...
//!         value_0_len:        length_field,
//!         ...
//!     },
//!     body:           {
//!         key_0:              String,
//!         ...
//!         value_0:            Int or ... or Array or Dictionary or aggregate,
//!         ...
//!     },
//! }
//! ```
//!
//! Built-in identifiers are decoded by [`BuiltinType`].
//! All other identifiers are looked up in a [`TypeRegistry`](crate::registry::TypeRegistry).

mod archivable;
mod builtin_type;
mod composite;
mod lengths;
mod scalar;


pub use archivable::*;
pub use builtin_type::*;
pub use composite::*;
pub use lengths::*;
pub use scalar::*;
