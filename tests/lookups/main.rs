//! Integration tests for lookups (Lookupable + LookupContext).


use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use counting_store::CountingStore;
use lookupable::{
    InMemoryRecordStore, LookupConfig, LookupContext, LookupError, Lookupable, LookupsExt,
    StoreError,
};
use models::{Berth, Country, Currency, OrderStatus, Port, Widget};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seeded_store() -> InMemoryRecordStore {
    let store = InMemoryRecordStore::new();
    store
        .insert_all(&[Widget::new(1, "a"), Widget::new(2, "b").into_trashed()])
        .unwrap();
    store
        .insert_all(&[
            Country::new(1, "netherlands", "NL"),
            Country {
                deleted_at: Some("2024-03-01T00:00:00Z".into()),
                ..Country::new(2, "yugoslavia", "YU")
            },
            Country::new(3, "belgium", "BE"),
        ])
        .unwrap();
    store
        .insert_all(&[Currency::new("Euro", "EUR"), Currency::new("Yen", "JPY")])
        .unwrap();
    store
        .insert_all(&[OrderStatus::new(1, "open"), OrderStatus::new(2, "paid")])
        .unwrap();
    store
}

fn context() -> LookupContext<CountingStore> {
    init_tracing();
    LookupContext::new(CountingStore::new(seeded_store()))
}

#[test]
fn derive_fills_in_type_configuration() {
    assert_eq!(Widget::COLLECTION, "widgets");
    assert_eq!(Widget::LOOKUP_COLUMN, None);
    assert!(Widget::SOFT_DELETES);

    assert_eq!(Country::COLLECTION, "countries");
    assert_eq!(Country::LOOKUP_COLUMN, Some("code"));

    assert_eq!(Currency::COLLECTION, "currencies");
    assert_eq!(Currency::LOOKUP_COLUMN, Some("meta.iso"));
    assert!(!Currency::SOFT_DELETES);

    assert_eq!(OrderStatus::COLLECTION, "order_statuses");
}

#[test]
fn widget_walkthrough() {
    let ctx = context();
    let widgets = ctx.lookups::<Widget>();

    assert_eq!(widgets.lookup("b").unwrap(), None);
    assert_eq!(
        widgets.lookup_with_trashed("b").unwrap(),
        Some(Widget::new(2, "b").into_trashed())
    );
    assert_eq!(widgets.lookup_many(["a", "b"]).unwrap(), vec![Widget::new(1, "a")]);
    assert_eq!(
        widgets.lookup_many_with_trashed(["a", "b"]).unwrap(),
        vec![Widget::new(1, "a"), Widget::new(2, "b").into_trashed()]
    );
}

#[test]
fn active_record_found_regardless_of_with_trashed() {
    let ctx = context();
    assert!(ctx.lookup::<Widget>("a", false).unwrap().is_some());
    assert!(ctx.lookup::<Widget>("a", true).unwrap().is_some());
}

#[test]
fn lookup_returns_first_match_in_storage_order() {
    let store = InMemoryRecordStore::new();
    store
        .insert_all(&[Widget::new(10, "dup"), Widget::new(11, "dup")])
        .unwrap();
    let ctx = LookupContext::new(store);

    let found = ctx.lookups::<Widget>().lookup_or_fail("dup").unwrap();
    assert_eq!(found.id, 10);
}

#[test]
fn custom_column_is_used_instead_of_identifier() {
    let ctx = context();
    let countries = ctx.lookups::<Country>();

    assert_eq!(countries.identifying_column().unwrap(), "code");
    assert_eq!(countries.lookup("NL").unwrap().unwrap().identifier, "netherlands");
    assert_eq!(countries.lookup("netherlands").unwrap(), None);
}

#[test]
fn deleted_at_timestamp_marks_record_trashed() {
    let ctx = context();
    let countries = ctx.lookups::<Country>();

    assert_eq!(countries.lookup("YU").unwrap(), None);
    assert_eq!(
        countries.lookup_or_fail_with_trashed("YU").unwrap().identifier,
        "yugoslavia"
    );

    let codes: Vec<_> = countries
        .lookup_many(vec!["BE", "YU", "NL"])
        .unwrap()
        .into_iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, ["NL", "BE"]);
}

#[test]
fn nested_column_path() {
    let ctx = context();
    let yen = ctx.lookups::<Currency>().lookup_or_fail("JPY").unwrap();
    assert_eq!(yen.name, "Yen");
}

#[test]
fn numeric_identifiers_compare_loosely_but_match_many_exactly() {
    let ctx = context();
    let statuses = ctx.lookups::<OrderStatus>();

    assert_eq!(statuses.lookup("2").unwrap().unwrap().label, "paid");
    assert_eq!(statuses.lookup("2.0").unwrap().unwrap().label, "paid");

    // Membership is exact: the stored number 2 is not the string "2".
    assert!(statuses.lookup_many(["1", "2"]).unwrap().is_empty());
    assert!(statuses.lookup_many_or_fail(["1", "2"]).is_err());
}

#[test]
fn numeric_string_identifiers_compare_as_numbers() {
    init_tracing();
    let store = InMemoryRecordStore::new();
    store
        .insert_all(&[Widget::new(1, "007"), Widget::new(2, "1e1")])
        .unwrap();
    let ctx = LookupContext::new(store);
    let widgets = ctx.lookups::<Widget>();

    assert_eq!(widgets.lookup_or_fail("7").unwrap().id, 1);
    assert_eq!(widgets.lookup_or_fail("10").unwrap().id, 2);
    assert_eq!(widgets.lookup("8").unwrap(), None);

    // Batch lookups stay exact.
    assert!(widgets.lookup_many(["7"]).unwrap().is_empty());
    assert_eq!(widgets.lookup_many(["007"]).unwrap().len(), 1);
}

#[test]
fn renamed_column_fields_use_serialized_names() {
    init_tracing();
    let store = InMemoryRecordStore::new();
    store
        .insert_all(&[Port::new("Rotterdam", "NLRTM"), Port::new("Antwerp", "BEANR")])
        .unwrap();
    store.insert(&Berth::new("Waalhaven", "WH-1")).unwrap();
    let ctx = LookupContext::new(store);

    assert_eq!(Port::LOOKUP_COLUMN, Some("externalCode"));
    assert_eq!(
        ctx.lookups::<Port>().lookup_or_fail("NLRTM").unwrap().port_name,
        "Rotterdam"
    );

    assert_eq!(Berth::LOOKUP_COLUMN, Some("berthRef"));
    assert_eq!(ctx.lookups::<Berth>().lookup_or_fail("WH-1").unwrap().name, "Waalhaven");
}

#[test]
fn runtime_column_override() {
    init_tracing();
    let config = LookupConfig::new().with_column::<Country>("identifier");
    let ctx = LookupContext::with_config(seeded_store(), config);

    let belgium = ctx.lookups::<Country>().lookup_or_fail("belgium").unwrap();
    assert_eq!(belgium.code, "BE");
    assert_eq!(ctx.lookups::<Country>().lookup("BE").unwrap(), None);
}

#[test]
fn lookup_or_fail_raises_not_found() {
    let ctx = context();
    let err = ctx.lookups::<Widget>().lookup_or_fail("b").unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "no Widget record found for [b]");
}

#[test]
fn lookup_many_or_fail_passes_partial_results() {
    let ctx = context();
    let widgets = ctx.lookups::<Widget>();

    let partial = widgets.lookup_many_or_fail(["a", "nope"]).unwrap();
    assert_eq!(partial.len(), 1);

    let err = widgets.lookup_many_or_fail(["nope", "b"]).unwrap_err();
    assert_eq!(
        err,
        LookupError::NotFound {
            record_type: "Widget",
            identifiers: vec!["nope".into(), "b".into()],
        }
    );
}

#[test]
fn lookup_many_accepts_sets() {
    let ctx = context();
    let ids: BTreeSet<String> = ["a".to_string(), "zzz".to_string()].into_iter().collect();
    assert_eq!(ctx.lookups::<Widget>().lookup_many(&ids).unwrap().len(), 1);
}

#[test]
fn empty_collection_yields_absent_results() {
    init_tracing();
    let ctx = LookupContext::new(InMemoryRecordStore::new());
    let widgets = ctx.lookups::<Widget>();

    assert_eq!(widgets.lookup("a").unwrap(), None);
    assert!(widgets.lookup_many(["a"]).unwrap().is_empty());
    assert!(widgets.instances().unwrap().is_empty());
}

#[test]
fn one_fetch_per_type() {
    let ctx = context();

    ctx.lookups::<Widget>().lookup("a").unwrap();
    ctx.lookups::<Widget>().lookup("missing").unwrap();
    ctx.lookups::<Widget>().lookup_many(["a", "b"]).unwrap();
    let _ = ctx.lookups::<Widget>().lookup_many_or_fail(["missing"]);
    assert_eq!(ctx.store().fetches(), 1);

    ctx.lookups::<Country>().lookup("NL").unwrap();
    assert_eq!(ctx.store().fetches(), 2);
}

#[test]
fn snapshot_is_not_refreshed_after_writes() {
    init_tracing();
    let store = seeded_store();
    let ctx = LookupContext::new(store.clone());

    assert_eq!(ctx.lookups::<Widget>().lookup("c").unwrap(), None);
    store.insert(&Widget::new(3, "c")).unwrap();
    assert_eq!(ctx.lookups::<Widget>().lookup("c").unwrap(), None);

    ctx.clear().unwrap();
    assert_eq!(ctx.lookups::<Widget>().lookup("c").unwrap(), Some(Widget::new(3, "c")));
}

#[test]
fn failed_fetch_is_not_memoized() {
    let ctx = context();
    ctx.store().fail_next(1);

    let err = ctx.lookups::<Widget>().lookup("a").unwrap_err();
    assert_eq!(
        err,
        LookupError::Store(StoreError::Storage("connection refused".into()))
    );
    assert!(!ctx.is_cached::<Widget>().unwrap());

    assert!(ctx.lookups::<Widget>().lookup("a").unwrap().is_some());
    assert_eq!(ctx.store().fetches(), 2);
}

#[test]
fn concurrent_first_lookups_fetch_once() {
    init_tracing();
    let store = CountingStore::new(seeded_store()).with_delay(Duration::from_millis(50));
    let ctx = Arc::new(LookupContext::new(store));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || ctx.lookups::<Widget>().lookup_or_fail("a").map(|w| w.id))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 1);
    }
    assert_eq!(ctx.store().fetches(), 1);
}

#[test]
fn instances_keep_trashed_records_and_column() {
    let ctx = context();
    let instances = ctx.lookups::<Widget>().instances().unwrap();

    assert_eq!(instances.column(), "identifier");
    let ids: Vec<_> = instances.iter().map(|w| w.identifier.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}
