//! End-to-end behavior of the flag store and scenario catalog against the
//! in-memory page, with both memory and file-backed storage.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tbd_flags::{
    FileStorage, FlagStore, KeyValueStore, MemoryStorage, PageModel, ScenarioCatalog,
    StoreSettings, ToastBoard,
};
use tbd_types::{Flag, FlagSet, TrackedEventKind};

fn open(storage: MemoryStorage) -> FlagStore<MemoryStorage, PageModel> {
    let settings = StoreSettings::default();
    let page = PageModel::standard(&settings.page);
    FlagStore::open(storage, page, settings)
}

fn stored_flags<S: KeyValueStore>(storage: &S) -> FlagSet {
    let raw = storage.get_item("featureFlags").unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn no_record_loads_defaults() {
    let store = open(MemoryStorage::new());
    assert_eq!(
        *store.flags(),
        FlagSet {
            dark_mode: false,
            new_header: false,
            analytics: false,
            premium_features: false,
        }
    );
    assert!(store.tracked_events().is_empty());
}

#[test]
fn partial_record_merges_over_defaults() {
    let store = open(MemoryStorage::with_item("featureFlags", r#"{"darkMode":true}"#));
    assert_eq!(
        *store.flags(),
        FlagSet {
            dark_mode: true,
            new_header: false,
            analytics: false,
            premium_features: false,
        }
    );
    assert!(store.page().body_has_class("dark-mode"));
}

#[test]
fn double_toggle_restores_and_persists() {
    let mut store = open(MemoryStorage::new());
    store.toggle(Flag::DarkMode, None);
    assert!(stored_flags(store.storage()).dark_mode);

    store.toggle(Flag::DarkMode, None);
    assert!(!store.is_enabled(Flag::DarkMode));
    assert!(!stored_flags(store.storage()).dark_mode);
}

#[test]
fn repeated_enable_re_emits_event() {
    let mut store = open(MemoryStorage::new());

    assert!(store.toggle(Flag::Analytics, Some(true)));
    assert_eq!(store.tracked_events().len(), 1);

    assert!(store.toggle(Flag::Analytics, Some(true)));
    let kinds: Vec<TrackedEventKind> = store.tracked_events().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TrackedEventKind::AnalyticsEnabled,
            TrackedEventKind::AnalyticsEnabled,
        ]
    );
    assert_eq!(store.page().is_visible("analytics-section"), Some(true));
}

#[test]
fn scenario_two_sets_flags_and_checkboxes() {
    let catalog = ScenarioCatalog::standard();
    let mut store = open(MemoryStorage::new());
    let mut toasts = ToastBoard::new(Duration::from_secs(3));

    let preset = catalog.apply(2, &mut store, &mut toasts).unwrap();
    assert_eq!(preset.name, "Sprint 2 - Analytics");

    let expected = FlagSet {
        dark_mode: true,
        new_header: true,
        analytics: true,
        premium_features: false,
    };
    assert_eq!(*store.flags(), expected);
    assert_eq!(stored_flags(store.storage()), expected);
    for (flag, enabled) in expected.iter() {
        assert_eq!(store.page().is_checked(flag.key()), Some(enabled), "{flag}");
    }
    assert_eq!(
        store.take_tracked_events().first().map(|e| e.kind),
        Some(TrackedEventKind::AnalyticsEnabled)
    );
}

#[test]
fn out_of_range_scenario_changes_nothing() {
    let catalog = ScenarioCatalog::standard();
    let mut store = open(MemoryStorage::new());
    store.toggle(Flag::NewHeader, Some(true));
    store.sync_checkboxes();
    let mut toasts = ToastBoard::new(Duration::from_secs(3));

    let flags_before = *store.flags();
    let page_before = store.page().clone();
    let storage_before = store.storage().clone();

    assert!(catalog.apply(99, &mut store, &mut toasts).is_none());
    assert_eq!(*store.flags(), flags_before);
    assert_eq!(*store.page(), page_before);
    assert_eq!(*store.storage(), storage_before);
    assert!(toasts.current().is_none());
}

#[test]
fn file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local-storage.json");
    let settings = StoreSettings::default();

    {
        let storage = FileStorage::open(&path).unwrap();
        let page = PageModel::standard(&settings.page);
        let mut store = FlagStore::open(storage, page, settings.clone());
        store.toggle(Flag::PremiumFeatures, None);
    }

    let storage = FileStorage::open(&path).unwrap();
    let page = PageModel::standard(&settings.page);
    let store = FlagStore::open(storage, page, settings);
    assert!(store.is_enabled(Flag::PremiumFeatures));
    assert_eq!(store.page().is_visible("premium-card"), Some(true));
    assert_eq!(
        store.tracked_events().first().map(|e| e.kind),
        Some(TrackedEventKind::PremiumFeaturesEnabled)
    );
}
