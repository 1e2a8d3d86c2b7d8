//! A sample aggregate and a small file-backed store of it.

pub mod fs_utils;
mod sample;
mod store;

pub use sample::*;
pub use store::*;

use archiver_types::registry::{self, TypeRegistry};

/// Activates [`Sample`] in the process-wide registry, then runs `custom_activations`.
///
/// Activation is idempotent, so calling this again is harmless.
pub fn activate_standard_archivables<F>(custom_activations: F) -> archiver_types::Result<()>
where
    F: FnOnce(&mut TypeRegistry) -> archiver_types::Result<()>,
{
    registry::activate_archivables(|registry| {
        registry.activate::<Sample>()?;
        custom_activations(registry)
    })
}
