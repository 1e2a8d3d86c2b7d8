use anyhow::{Context, Result};
use fs2::FileExt;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};


/// Overrides the archive file that the CLI saves to and loads from.
/// Read by the CLI's argument parser, not here.
pub const ENV_VAR_DATA_PATH: &str = "ARCHIVER_DATA_PATH";

pub const DATA_DIR_NAME: &str = "archiver";
pub const DATA_FILE_NAME: &str = "samples.data";

/// The archive file used when neither `--data-path` nor [`ENV_VAR_DATA_PATH`] is given.
pub fn default_data_path() -> PathBuf {
    env::temp_dir().join(DATA_DIR_NAME).join(DATA_FILE_NAME)
}

pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).with_context(|| format!("create_dir_all {path:?}"))
}

pub fn open_file<P: AsRef<Path>>(path: P, oo: &OpenOptions) -> Result<File> {
    let path = path.as_ref();
    oo.open(path).with_context(|| format!("open {path:?}"))
}

/// Reads the whole file under a shared lock.
///
/// Returns `None` if the file does not exist.
pub fn read_locked<P: AsRef<Path>>(path: P) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    let mut file = match OpenOptions::new().read(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("open {path:?}")),
    };
    file.try_lock_shared()
        .with_context(|| format!("try_lock_shared {path:?}"))?;

    let mut buf = vec![];
    file.read_to_end(&mut buf)
        .with_context(|| format!("read_to_end {path:?}"))?;
    Ok(Some(buf))
}

/// Replaces the file's contents under an exclusive lock, creating the parent dir if needed.
pub fn write_locked<P: AsRef<Path>>(path: P, buf: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = open_file(path, OpenOptions::new().write(true).create(true).truncate(false))?;
    file.try_lock_exclusive()
        .with_context(|| format!("try_lock_exclusive {path:?}"))?;

    file.set_len(0).with_context(|| format!("set_len {path:?}"))?;
    file.write_all(buf).with_context(|| format!("write_all {path:?}"))?;
    file.sync_data().with_context(|| format!("sync_data {path:?}"))?;
    Ok(())
}
