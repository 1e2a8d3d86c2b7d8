//! Identifier-keyed decode and reconstruct procedures.
//!
//! Built-in identifiers (see [`BuiltinType`]) are always decodable.
//! Any other identifier is decodable only after a procedure has been registered for it,
//! typically by [`TypeRegistry::activate()`]ing an [`Aggregate`].
//!
//! A process-wide registry is available through [`activate()`], [`decode()`] and friends.
//! Finish activation before decoding concurrently; the global lock serializes them anyway.
//!
//! The global functions take the global lock, which is not reentrant. Called from activation
//! callbacks, decode procedures, or [`Aggregate::reconstruct()`] that run under it, they fail
//! with [`ArchiveError::ReentrantGlobalAccess`] instead of deadlocking.

use crate::byte_range;
use crate::serde::{checked_identifier_len, deser_dictionary, BuiltinType};
use crate::types::{Aggregate, Dictionary, Value};
use crate::{ArchiveError, Result};
use derive_more::{Deref, From};
use once_cell::sync::Lazy;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::{self, TypeId};
use std::cell::Cell;
use std::collections::HashMap;
use std::str;
use std::sync::Arc;
use tracing::{debug, warn};


/// How far below the top-level value decoding may descend.
pub const MAX_NESTING_DEPTH: usize = 128;

/// The nesting level of the value being decoded. The top-level value is at depth 0.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct Depth(usize);

impl Depth {
    /// The depth of this value's members.
    pub fn member(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Turns the bytes following an identifier into a [`Value`].
///
/// The registry and the current depth are passed in so that nested members can be decoded
/// through [`TypeRegistry::decode_at()`].
pub type DecodeProcedure =
    Arc<dyn Fn(&[u8], &TypeRegistry, Depth) -> Result<Value> + Send + Sync>;

/// Turns a decoded [`Dictionary`] into a concrete value, usually a [`Value::Record`].
pub type ReconstructProcedure = Arc<dyn Fn(Dictionary) -> Value + Send + Sync>;

/// The Rust type that activated an identifier.
#[derive(Clone, Copy)]
struct Owner {
    type_id: TypeId,
    type_name: &'static str,
}
impl Owner {
    fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }
}

#[derive(Default)]
struct Entry {
    decode: Option<DecodeProcedure>,
    reconstruct: Option<ReconstructProcedure>,
    owner: Option<Owner>,
}

#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<String, Entry>,
}

/* Registration. */
impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under [`Aggregate::IDENTIFIER`]:
    /// the dictionary decode procedure, followed by [`Aggregate::reconstruct()`].
    ///
    /// Activating the same type again is a no-op.
    /// Activating a different type under an identifier that is already taken is an error.
    pub fn activate<T: Aggregate>(&mut self) -> Result<()> {
        let identifier = T::IDENTIFIER;
        Self::check_registrable(identifier)?;

        let owner = Owner::of::<T>();
        if let Some(entry) = self.entries.get(identifier) {
            return match entry.owner {
                Some(existing) if existing.type_id == owner.type_id => Ok(()),
                Some(existing) => Err(ArchiveError::IdentifierCollision {
                    identifier: identifier.to_owned(),
                    owner: existing.type_name,
                }),
                None => Err(ArchiveError::IdentifierCollision {
                    identifier: identifier.to_owned(),
                    owner: "a procedure registration",
                }),
            };
        }

        let entry = Entry {
            decode: Some(dictionary_procedure()),
            reconstruct: Some(Arc::new(|dict: Dictionary| {
                Value::record(T::reconstruct(&dict))
            })),
            owner: Some(owner),
        };
        self.entries.insert(identifier.to_owned(), entry);
        debug!(identifier, type_name = owner.type_name, "Activated aggregate.");
        Ok(())
    }

    /// Installs `procedure`, replacing any decode procedure previously registered for `identifier`.
    pub fn register_decode_procedure<S: Into<String>>(
        &mut self,
        identifier: S,
        procedure: DecodeProcedure,
    ) -> Result<()> {
        let entry = self.raw_entry(identifier.into())?;
        entry.decode = Some(procedure);
        Ok(())
    }

    /// Installs `procedure`, replacing any reconstruct procedure previously registered for `identifier`.
    pub fn register_reconstruct_procedure<S: Into<String>>(
        &mut self,
        identifier: S,
        procedure: ReconstructProcedure,
    ) -> Result<()> {
        let entry = self.raw_entry(identifier.into())?;
        entry.reconstruct = Some(procedure);
        Ok(())
    }

    fn raw_entry(&mut self, identifier: String) -> Result<&mut Entry> {
        Self::check_registrable(&identifier)?;
        let entry = self.entries.entry(identifier).or_default();
        if let Some(owner) = entry.owner.take() {
            warn!(
                type_name = owner.type_name,
                "Procedure registration replaces an activated aggregate."
            );
        }
        Ok(entry)
    }

    fn check_registrable(identifier: &str) -> Result<()> {
        checked_identifier_len(identifier)?;
        if BuiltinType::from_identifier(identifier).is_some() {
            return Err(ArchiveError::ReservedIdentifier(identifier.to_owned()));
        }
        Ok(())
    }
}

/* Lookup. */
impl TypeRegistry {
    pub fn is_decodable(&self, identifier: &str) -> bool {
        self.decode_procedure(identifier).is_some()
    }

    pub fn decode_procedure(&self, identifier: &str) -> Option<DecodeProcedure> {
        if let Some(builtin) = BuiltinType::from_identifier(identifier) {
            return Some(Arc::new(
                move |buf: &[u8], registry: &TypeRegistry, depth: Depth| {
                    builtin.decode(buf, registry, depth)
                },
            ));
        }
        self.entries
            .get(identifier)
            .and_then(|entry| entry.decode.clone())
    }

    pub fn reconstruct_procedure(&self, identifier: &str) -> Option<ReconstructProcedure> {
        self.entries
            .get(identifier)
            .and_then(|entry| entry.reconstruct.clone())
    }
}

/* Decoding. */
impl TypeRegistry {
    /// Decodes one complete encoding at the front of `buf`.
    ///
    /// Returns `Ok(None)` if the identifier is neither built-in nor registered.
    /// Bytes following the encoding are ignored.
    pub fn decode(&self, buf: &[u8]) -> Result<Option<Value>> {
        self.decode_at(buf, Depth::default())
    }

    /// Decodes a value nested at `depth`.
    ///
    /// Fails with [`ArchiveError::TooDeep`] beyond [`MAX_NESTING_DEPTH`].
    pub fn decode_at(&self, buf: &[u8], depth: Depth) -> Result<Option<Value>> {
        if *depth > MAX_NESTING_DEPTH {
            return Err(ArchiveError::TooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }

        let (id_len, rest) = byte_range::split(buf, 1)?;
        let (id_buf, rest) = byte_range::split(rest, id_len[0] as usize)?;
        let identifier = match str::from_utf8(id_buf) {
            Ok(identifier) => identifier,
            Err(e) => {
                debug!(%e, "Identifier is not UTF-8.");
                return Ok(None);
            }
        };

        let val = if let Some(builtin) = BuiltinType::from_identifier(identifier) {
            builtin.decode(rest, self, depth)?
        } else {
            match self.entries.get(identifier).and_then(|e| e.decode.as_ref()) {
                Some(procedure) => procedure(rest, self, depth)?,
                None => {
                    debug!(identifier, "Unknown identifier.");
                    return Ok(None);
                }
            }
        };

        let reconstruct = self
            .entries
            .get(identifier)
            .and_then(|e| e.reconstruct.as_ref());
        match (val, reconstruct) {
            (Value::Dictionary(dict), Some(reconstruct)) => Ok(Some(reconstruct(dict))),
            (val, _) => Ok(Some(val)),
        }
    }
}

/// The decode procedure shared by every [`Aggregate`].
pub fn dictionary_procedure() -> DecodeProcedure {
    Arc::new(|buf: &[u8], registry: &TypeRegistry, depth: Depth| {
        let dict = deser_dictionary(buf, registry, depth)?;
        Ok(Value::Dictionary(dict))
    })
}

/* The process-wide registry. */

static GLOBAL_REGISTRY: Lazy<RwLock<TypeRegistry>> =
    Lazy::new(|| RwLock::new(TypeRegistry::new()));

thread_local! {
    static HOLDS_GLOBAL: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as holding the global lock until dropped.
struct HeldGlobal;

impl HeldGlobal {
    fn mark() -> Result<Self> {
        if HOLDS_GLOBAL.with(Cell::get) {
            return Err(ArchiveError::ReentrantGlobalAccess);
        }
        HOLDS_GLOBAL.with(|held| held.set(true));
        Ok(Self)
    }
}

impl Drop for HeldGlobal {
    fn drop(&mut self) {
        HOLDS_GLOBAL.with(|held| held.set(false));
    }
}

/// The raw guards are not reentrancy-checked. Prefer [`activate()`] and [`decode()`].
pub fn global() -> RwLockReadGuard<'static, TypeRegistry> {
    GLOBAL_REGISTRY.read()
}

pub fn global_mut() -> RwLockWriteGuard<'static, TypeRegistry> {
    GLOBAL_REGISTRY.write()
}

pub fn activate<T: Aggregate>() -> Result<()> {
    let _held = HeldGlobal::mark()?;
    global_mut().activate::<T>()
}

/// Runs `custom_activations` under one write lock.
///
/// Built-in types need no activation; this is where an application activates its aggregates.
/// Activate through the `&mut TypeRegistry` argument. The global functions called from inside
/// `custom_activations` fail with [`ArchiveError::ReentrantGlobalAccess`].
pub fn activate_archivables<F>(custom_activations: F) -> Result<()>
where
    F: FnOnce(&mut TypeRegistry) -> Result<()>,
{
    let _held = HeldGlobal::mark()?;
    let mut registry = global_mut();
    custom_activations(&mut registry)
}

/// Fails with [`ArchiveError::ReentrantGlobalAccess`] when called from a decode procedure or
/// [`Aggregate::reconstruct()`] that is running under the global registry.
pub fn decode(buf: &[u8]) -> Result<Option<Value>> {
    let _held = HeldGlobal::mark()?;
    global().decode(buf)
}
