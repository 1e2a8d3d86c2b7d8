use crate::fs_utils;
use crate::sample::Sample;
use anyhow::Result;
use archiver_types::types::Value;
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(test)]
mod test;

/// What [`SampleStore::load()`] found.
#[derive(PartialEq, Eq, Debug)]
pub enum LoadOutcome {
    /// The store now holds this many samples.
    Loaded(usize),
    /// There is no archive file. The store is unchanged.
    NoData,
    /// The file does not decode to an array. The store is unchanged.
    FailedToConvert,
}

/// Samples ordered newest first.
#[derive(Default, Debug)]
pub struct SampleStore {
    samples: Vec<Sample>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Inserts a sample stamped with the current time at the front.
    pub fn add<S: Into<String>>(&mut self, title: S) -> &Sample {
        self.insert(Sample::now(title))
    }

    pub fn insert(&mut self, sample: Sample) -> &Sample {
        self.samples.insert(0, sample);
        &self.samples[0]
    }

    /// Returns whether there was anything to remove.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.samples.is_empty();
        self.samples.clear();
        had_any
    }

    /// The archive of all samples: an `Array` of `Sample` aggregates.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let arr = self
            .samples
            .iter()
            .cloned()
            .map(Value::record)
            .collect::<Vec<_>>();
        let buf = archiver_types::encode(&arr)?;
        Ok(buf)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let buf = self.encode()?;
        fs_utils::write_locked(path, &buf)?;
        info!(?path, count = self.samples.len(), "Saved samples.");
        Ok(())
    }

    /// Replaces the samples with those archived at `path`.
    ///
    /// Decodes through the process-wide registry, so [`Sample`] must have been activated;
    /// see [`activate_standard_archivables()`](crate::activate_standard_archivables).
    /// Array elements that are not samples are left out.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadOutcome> {
        let path = path.as_ref();
        let buf = match fs_utils::read_locked(path)? {
            None => return Ok(LoadOutcome::NoData),
            Some(buf) => buf,
        };

        let vals = match archiver_types::decode(&buf) {
            Ok(Some(Value::Array(vals))) => vals,
            Ok(other) => {
                warn!(?path, ?other, "Archive is not an array.");
                return Ok(LoadOutcome::FailedToConvert);
            }
            Err(e) => {
                warn!(?path, %e, "Archive does not decode.");
                return Ok(LoadOutcome::FailedToConvert);
            }
        };

        let total = vals.len();
        self.samples = vals
            .into_iter()
            .filter_map(Value::into_record::<Sample>)
            .collect();
        if self.samples.len() < total {
            debug!(
                skipped = total - self.samples.len(),
                "Left out array elements that are not samples."
            );
        }
        Ok(LoadOutcome::Loaded(self.samples.len()))
    }
}
