use anyhow::Result;
use archiver_sample::{activate_standard_archivables, LoadOutcome, Sample, SampleStore};
use archiver_types::serde::{Archivable, FilterPolicy, LengthField};
use archiver_types::types::{Aggregate, Dictionary, Value};
use archiver_types::ArchiveError;
use itertools::Itertools;
use rand::seq::SliceRandom;

/// An aggregate with nested collections, activated through the custom hook.
#[derive(PartialEq, Clone, Debug)]
struct Note {
    body: String,
    tags: Vec<Value>,
    attrs: Dictionary,
    revision: u64,
}
impl Aggregate for Note {
    const IDENTIFIER: &'static str = "Note";

    fn fields(&self) -> Vec<(&'static str, &dyn Archivable)> {
        vec![
            ("body", &self.body),
            ("tags", &self.tags),
            ("attrs", &self.attrs),
            ("revision", &self.revision),
        ]
    }

    fn reconstruct(dict: &Dictionary) -> Self {
        Note {
            body: dict.get_str("body").unwrap_or_default().to_owned(),
            tags: dict.get_array("tags").map(<[Value]>::to_vec).unwrap_or_default(),
            attrs: dict.get_dictionary("attrs").cloned().unwrap_or_default(),
            revision: dict.get_uint("revision").unwrap_or_default(),
        }
    }
}

fn activate() -> Result<()> {
    activate_standard_archivables(|registry| registry.activate::<Note>())?;
    Ok(())
}

fn gen_note() -> Note {
    Note {
        body: String::from("Remember the eggs"),
        tags: vec![Value::from("errand"), Value::Int(2)],
        attrs: [("pinned", Value::UInt(1))].into_iter().collect(),
        revision: 3,
    }
}

fn roundtrip(val: &Value) -> Result<()> {
    let encoded = archiver_types::encode(val)?;
    let decoded = archiver_types::decode(&encoded)?;
    assert_eq!(decoded.as_ref(), Some(val), "{val:?}");
    Ok(())
}

#[test]
fn sample_scenario() -> Result<()> {
    activate()?;
    let sample = Sample::new("Buy milk", 1_700_000_000.0);
    let encoded = archiver_types::encode(&sample)?;

    let parts = [
        String::from("title").encode()?,
        String::from("timestamp").encode()?,
        String::from("Buy milk").encode()?,
        1_700_000_000.0f64.encode()?,
    ];
    let mut exp = vec![6u8];
    exp.extend_from_slice(b"Sample");
    exp.extend_from_slice(&LengthField::from(2).ser()?);
    for part in parts.iter() {
        exp.extend_from_slice(&LengthField::from(part.len()).ser()?);
    }
    for part in parts.iter() {
        exp.extend_from_slice(part);
    }
    assert_eq!(encoded, exp);

    let decoded = archiver_types::decode(&encoded)?;
    assert_eq!(decoded.and_then(Value::into_record::<Sample>), Some(sample));
    Ok(())
}

#[test]
fn custom_activation() -> Result<()> {
    activate()?;
    activate()?;

    let note = gen_note();
    roundtrip(&Value::record(note.clone()))?;

    let decoded = archiver_types::decode(&archiver_types::encode(&note)?)?;
    assert_eq!(decoded.as_ref().and_then(Value::downcast_ref::<Note>), Some(&note));
    Ok(())
}

#[test]
fn mixed_collections() -> Result<()> {
    activate()?;
    let mut rand_rng = rand::thread_rng();

    let gen_fns: [fn() -> Value; 6] = [
        || Value::Int(-1),
        || Value::Double(0.125),
        || Value::from("テキスト"),
        || Value::record(Sample::new("Buy milk", 1_700_000_000.0)),
        || Value::record(gen_note()),
        || Value::Array(vec![Value::record(Sample::new("", 0.0))]),
    ];

    for mut gen_fns in gen_fns.iter().powerset() {
        let vals = gen_fns.iter().map(|gen| gen()).collect::<Vec<_>>();
        roundtrip(&Value::Array(vals))?;

        gen_fns.shuffle(&mut rand_rng);
        let dict = gen_fns
            .iter()
            .enumerate()
            .map(|(i, gen)| (format!("k{i}"), gen()))
            .collect::<Dictionary>();
        roundtrip(&Value::Dictionary(dict))?;
    }
    Ok(())
}

#[test]
fn persistence() -> Result<()> {
    activate()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("archiver").join("samples.data");

    let mut store = SampleStore::new();
    assert_eq!(store.load(&path)?, LoadOutcome::NoData);

    store.add("Buy milk");
    store.add("Walk the dog");
    store.save(&path)?;

    let mut reloaded = SampleStore::new();
    assert_eq!(reloaded.load(&path)?, LoadOutcome::Loaded(2));
    assert_eq!(reloaded.samples(), store.samples());
    assert_eq!(reloaded.samples()[0].title, "Walk the dog");

    /* The file is an ordinary archive. */
    let raw = std::fs::read(&path)?;
    let decoded = archiver_types::decode(&raw)?;
    let arr = decoded.as_ref().and_then(Value::as_array).map(<[Value]>::len);
    assert_eq!(arr, Some(2));
    Ok(())
}

#[test]
fn strict_policy() -> Result<()> {
    #[derive(PartialEq, Clone, Debug)]
    struct LongName(String);
    impl Archivable for LongName {
        fn identifier(&self) -> &str {
            &self.0
        }
        fn payload_len(&self, _policy: FilterPolicy) -> archiver_types::Result<usize> {
            Ok(0)
        }
        fn header(&self, _policy: FilterPolicy) -> archiver_types::Result<Vec<Vec<u8>>> {
            Ok(vec![])
        }
        fn body(&self, _policy: FilterPolicy) -> archiver_types::Result<Vec<Vec<u8>>> {
            Ok(vec![])
        }
    }

    #[derive(PartialEq, Clone, Debug)]
    struct Wrapper {
        long: LongName,
        n: i64,
    }
    impl Aggregate for Wrapper {
        const IDENTIFIER: &'static str = "Wrapper";
        fn fields(&self) -> Vec<(&'static str, &dyn Archivable)> {
            vec![("long", &self.long), ("n", &self.n)]
        }
        fn reconstruct(dict: &Dictionary) -> Self {
            Wrapper {
                long: LongName(String::new()),
                n: dict.get_int("n").unwrap_or_default(),
            }
        }
    }

    let long = LongName("L".repeat(256));
    let wrapper = Wrapper {
        long: long.clone(),
        n: 1,
    };

    let lenient = archiver_types::encode(&wrapper)?;
    assert_eq!(lenient.len(), wrapper.encoded_len(FilterPolicy::Drop)?);
    assert!(matches!(
        archiver_types::encode_with(&wrapper, FilterPolicy::Fail),
        Err(ArchiveError::NotEncodable(_))
    ));
    assert!(matches!(
        archiver_types::encode(&long),
        Err(ArchiveError::IdentifierTooLong { len: 256, .. })
    ));
    Ok(())
}
