mod aggregate;
mod dictionary;
mod value;

pub use aggregate::*;
pub use dictionary::*;
pub use value::*;
