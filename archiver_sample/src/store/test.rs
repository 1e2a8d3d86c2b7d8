use super::*;
use crate::activate_standard_archivables;
use archiver_types::types::Dictionary;
use std::fs;

fn gen_store() -> SampleStore {
    let mut store = SampleStore::new();
    store.insert(Sample::new("Buy milk", 1_700_000_000.0));
    store.insert(Sample::new("Walk the dog", 1_700_000_360.5));
    store
}

#[test]
fn add_inserts_at_front() {
    let mut store = gen_store();
    let added = store.add("Call mom").clone();
    assert_eq!(store.len(), 3);
    assert_eq!(store.samples()[0], added);
    assert!(added.timestamp > 1_700_000_360.5);
    assert_eq!(store.samples()[2].title, "Buy milk");
}

#[test]
fn clear_reports_removal() {
    let mut store = gen_store();
    assert!(store.clear());
    assert!(store.is_empty());
    assert!(!store.clear());
}

#[test]
fn save_then_load() -> anyhow::Result<()> {
    activate_standard_archivables(|_| Ok(()))?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("samples.data");

    let store = gen_store();
    store.save(&path)?;

    let mut loaded = SampleStore::new();
    assert_eq!(loaded.load(&path)?, LoadOutcome::Loaded(2));
    assert_eq!(loaded.samples(), store.samples());

    /* Saving again overwrites rather than appends. */
    let mut store = store;
    store.clear();
    store.insert(Sample::new("Only", 1.0));
    store.save(&path)?;
    assert_eq!(loaded.load(&path)?, LoadOutcome::Loaded(1));
    assert_eq!(loaded.samples(), store.samples());
    Ok(())
}

#[test]
fn load_without_data() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut store = gen_store();
    assert_eq!(
        store.load(dir.path().join("missing.data"))?,
        LoadOutcome::NoData
    );
    assert_eq!(store.len(), 2);
    Ok(())
}

#[test]
fn load_unconvertible() -> anyhow::Result<()> {
    activate_standard_archivables(|_| Ok(()))?;
    let dir = tempfile::tempdir()?;
    let mut store = gen_store();

    let path = dir.path().join("garbage.data");
    fs::write(&path, [9u8, 1, 2])?;
    assert_eq!(store.load(&path)?, LoadOutcome::FailedToConvert);

    let path = dir.path().join("dictionary.data");
    fs::write(&path, archiver_types::encode(&Dictionary::new())?)?;
    assert_eq!(store.load(&path)?, LoadOutcome::FailedToConvert);

    let path = dir.path().join("sample.data");
    fs::write(&path, archiver_types::encode(&Sample::new("Lone", 1.0))?)?;
    assert_eq!(store.load(&path)?, LoadOutcome::FailedToConvert);

    assert_eq!(store.len(), 2);
    Ok(())
}

#[test]
fn load_skips_foreign_elements() -> anyhow::Result<()> {
    activate_standard_archivables(|_| Ok(()))?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mixed.data");

    let arr = vec![
        Value::from("not a sample"),
        Value::record(Sample::new("Buy milk", 1_700_000_000.0)),
        Value::Int(3),
    ];
    fs::write(&path, archiver_types::encode(&arr)?)?;

    let mut store = SampleStore::new();
    assert_eq!(store.load(&path)?, LoadOutcome::Loaded(1));
    assert_eq!(store.samples()[0].title, "Buy milk");
    Ok(())
}

#[test]
fn load_too_deep() -> anyhow::Result<()> {
    use archiver_types::serde::{write_identifier, Archivable, LengthField};

    let mut buf = 7i64.encode()?;
    for _ in 0..2_000 {
        let mut outer = vec![];
        write_identifier("Array", &mut outer)?;
        outer.extend_from_slice(&LengthField::from(1).ser()?);
        outer.extend_from_slice(&LengthField::from(buf.len()).ser()?);
        outer.extend_from_slice(&buf);
        buf = outer;
    }

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("deep.data");
    fs::write(&path, &buf)?;

    let mut store = gen_store();
    assert_eq!(store.load(&path)?, LoadOutcome::FailedToConvert);
    assert_eq!(store.len(), 2);
    Ok(())
}
