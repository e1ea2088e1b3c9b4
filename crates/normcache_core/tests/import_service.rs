use futures::executor::block_on;
use normcache_core::{
    EntityKind, EntityStore, ImportConfig, ImportError, ImportService, MemoryStore, RawBatch,
};
use serde_json::json;

fn accounts() -> RawBatch {
    serde_json::from_value(json!({
        "kind": "accounts",
        "items": [{"id": "a", "moved": {"id": "b"}}, {"id": "c"}]
    }))
    .unwrap()
}

#[test]
fn import_applies_one_emission_and_reports_counts() {
    let mut service = ImportService::new(MemoryStore::new(), ImportConfig::default());
    let report = service.import(&accounts()).unwrap();

    assert_eq!(report.commands, vec!["accounts"]);
    assert_eq!(report.counts[&EntityKind::Account], 3);
    assert_eq!(report.total(), 3);
    assert_eq!(service.store().applied_batches(), &[report.batch_id]);
}

#[test]
fn import_json_reports_decode_errors() {
    let mut service = ImportService::new(MemoryStore::new(), ImportConfig::default());

    let err = service.import_json("{not json").unwrap_err();
    assert!(matches!(err, ImportError::Decode(_)));
    assert!(service.store().is_empty());

    let report = service
        .import_json(r#"{"kind": "job", "items": {"id": 4, "title": "Chef"}}"#)
        .unwrap();
    assert_eq!(report.commands, vec!["job"]);
}

#[test]
fn failed_fetch_emits_nothing() {
    let mut service = ImportService::new(MemoryStore::new(), ImportConfig::default());

    let outcome = service
        .complete_fetch(Err::<RawBatch, _>("connection reset"))
        .unwrap();

    assert!(outcome.is_none());
    assert!(service.store().applied_batches().is_empty());
    assert_eq!(service.store().count(EntityKind::Account).unwrap(), 0);
}

#[test]
fn awaited_fetch_is_imported_when_ready() {
    let mut service = ImportService::new(MemoryStore::new(), ImportConfig::default());

    let report = block_on(service.import_when_ready(async { Ok::<_, String>(accounts()) }))
        .unwrap()
        .unwrap();
    assert_eq!(report.total(), 3);

    let aborted = block_on(service.import_when_ready(async {
        Err::<RawBatch, _>("aborted".to_string())
    }))
    .unwrap();
    assert!(aborted.is_none());
    assert_eq!(service.into_store().applied_batches().len(), 1);
}

#[test]
fn report_serializes_kind_keys() {
    let mut service = ImportService::new(MemoryStore::new(), ImportConfig::default());
    let report = service.import(&accounts()).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["counts"]["account"], 3);
    assert_eq!(value["commands"][0], "accounts");
}
