use crate::serde::{Archivable, Chunk, FilterPolicy, MapParts};
use crate::types::Dictionary;
use crate::Result;
use std::any::Any;
use std::fmt;

/// A user-defined record that is archived as a dictionary of its fields.
///
/// The encoding is the [`Dictionary`] layout, tagged with [`Self::IDENTIFIER`]
/// instead of `"Dictionary"`, with pairs in the order [`Self::fields()`] lists them.
///
/// Decoding requires the type to be activated in a registry first;
/// see [`TypeRegistry::activate()`](crate::registry::TypeRegistry::activate).
///
/// ```
/// use archiver_types::serde::Archivable;
/// use archiver_types::types::{Aggregate, Dictionary};
///
/// #[derive(PartialEq, Clone, Debug)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Aggregate for Point {
///     const IDENTIFIER: &'static str = "Point";
///
///     fn fields(&self) -> Vec<(&'static str, &dyn Archivable)> {
///         vec![("x", &self.x), ("y", &self.y)]
///     }
///
///     fn reconstruct(dict: &Dictionary) -> Self {
///         Point {
///             x: dict.get_int("x").unwrap_or_default(),
///             y: dict.get_int("y").unwrap_or_default(),
///         }
///     }
/// }
/// ```
pub trait Aggregate: PartialEq + Clone + fmt::Debug + Send + Sync + 'static {
    const IDENTIFIER: &'static str;

    /// The named fields to archive.
    fn fields(&self) -> Vec<(&'static str, &dyn Archivable)>;

    /// Rebuilds an instance from decoded fields.
    ///
    /// Must not fail. Fields that are absent or of an unexpected type should be defaulted.
    /// Runs while the decoding registry is borrowed. The global [`decode()`](crate::decode)
    /// fails here with [`ArchiveError::ReentrantGlobalAccess`](crate::ArchiveError).
    fn reconstruct(dict: &Dictionary) -> Self;
}

impl<T: Aggregate> Archivable for T {
    fn identifier(&self) -> &str {
        T::IDENTIFIER
    }
    fn payload_len(&self, policy: FilterPolicy) -> Result<usize> {
        MapParts::admit(self.fields(), policy)?.payload_len(policy)
    }
    fn header(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        MapParts::admit(self.fields(), policy)?.header(policy)
    }
    fn body(&self, policy: FilterPolicy) -> Result<Vec<Chunk>> {
        MapParts::admit(self.fields(), policy)?.body(policy)
    }
}

/// An [`Aggregate`] with its concrete type erased, as held by [`Value::Record`](crate::types::Value::Record).
pub trait Record: Archivable + Send + Sync {
    fn as_archivable(&self) -> &dyn Archivable;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_record(&self) -> Box<dyn Record>;
    fn eq_record(&self, other: &dyn Record) -> bool;
}

impl<T: Aggregate> Record for T {
    fn as_archivable(&self) -> &dyn Archivable {
        self
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }
    fn eq_record(&self, other: &dyn Record) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

impl Clone for Box<dyn Record> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

impl PartialEq for Box<dyn Record> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_record(other.as_ref())
    }
}
