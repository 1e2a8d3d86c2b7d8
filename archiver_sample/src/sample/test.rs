use super::*;
use archiver_types::registry::TypeRegistry;
use archiver_types::types::Value;
use archiver_types::ArchiveError;

#[test]
fn encode_then_decode() -> anyhow::Result<()> {
    let sample = Sample::new("Buy milk", 1_700_000_000.0);
    let encoded = sample.encode()?;
    assert_eq!(&encoded[..7], b"\x06Sample");

    let mut registry = TypeRegistry::new();
    assert_eq!(registry.decode(&encoded)?, None);

    registry.activate::<Sample>()?;
    let decoded = registry.decode(&encoded)?;
    assert_eq!(decoded, Some(Value::record(sample)));
    Ok(())
}

#[test]
fn reconstruct_requires_both_fields() {
    let dict: Dictionary = [("title", "Buy milk")].into_iter().collect();
    assert_eq!(Sample::reconstruct(&dict), Sample::new("", 0.0));

    let dict: Dictionary = [("title", Value::from("Buy milk")), ("timestamp", Value::Int(1))]
        .into_iter()
        .collect();
    assert_eq!(Sample::reconstruct(&dict), Sample::new("", 0.0));

    let dict: Dictionary = [("title", Value::from("Buy milk")), ("timestamp", Value::Double(2.5))]
        .into_iter()
        .collect();
    assert_eq!(Sample::reconstruct(&dict), Sample::new("Buy milk", 2.5));
}

#[test]
fn formatted_time() {
    assert_eq!(
        Sample::new("", 1_700_000_000.0).formatted_time(),
        "2023.11.14 22:13:20"
    );
    assert_eq!(Sample::new("", 0.0).formatted_time(), "1970.1.1 0:0:00");
    assert_eq!(
        Sample::new("", 1_704_078_245.75).formatted_time(),
        "2024.1.1 3:4:05"
    );
    assert_eq!(
        Sample::new("Buy milk", 0.0).to_string(),
        "1970.1.1 0:0:00  Buy milk"
    );
}

#[test]
fn collides_with_other_owners() -> anyhow::Result<()> {
    #[derive(PartialEq, Clone, Debug)]
    struct Other;
    impl Aggregate for Other {
        const IDENTIFIER: &'static str = "Sample";
        fn fields(&self) -> Vec<(&'static str, &dyn Archivable)> {
            vec![]
        }
        fn reconstruct(_dict: &Dictionary) -> Self {
            Other
        }
    }

    let mut registry = TypeRegistry::new();
    registry.activate::<Sample>()?;
    assert!(matches!(
        registry.activate::<Other>(),
        Err(ArchiveError::IdentifierCollision { .. })
    ));
    Ok(())
}
