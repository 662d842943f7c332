//! The feature flag store.
//!
//! [`FlagStore`] owns the current [`FlagSet`], the storage it persists to,
//! and the page surface its effects write to. It is an explicit context
//! object: whatever wires UI events (the demo's command loop, a web host)
//! holds it and calls into it.
//!
//! # Lifecycle
//!
//! ```text
//! open ──> load (merge over defaults) ──> save ──> apply_all
//!            ^
//! toggle ────┴─> save ──> apply(flag)
//! replace ──────> save ──> apply_all
//! ```
//!
//! Every mutation persists before it is presented. Persistence never fails
//! the caller: a bad record loads as defaults and a failed write is logged.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tbd_types::{Flag, FlagSet, TrackedEvent, TrackedEventKind};

use crate::config::PageSettings;
use crate::error::StorageError;
use crate::presentation::PageSurface;
use crate::storage::{self, KeyValueStore};

/// Settings a [`FlagStore`] needs beyond its storage and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Key the flag record is persisted under.
    pub storage_key: String,
    /// Element ids, class names, and texts the effects use.
    pub page: PageSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage_key: "featureFlags".to_owned(),
            page: PageSettings::default(),
        }
    }
}

/// The persisted shape: the four flags plus any names assigned through
/// [`FlagStore::toggle_by_name`] that are not flags.
#[derive(Serialize)]
struct PersistedRecord<'a> {
    #[serde(flatten)]
    unrecognized: &'a BTreeMap<String, bool>,
    #[serde(flatten)]
    flags: &'a FlagSet,
}

/// Overlay each flag's persisted boolean on the defaults.
fn merge_record(record: &Map<String, Value>) -> FlagSet {
    let mut flags = FlagSet::default();
    for flag in Flag::ALL {
        match record.get(flag.key()) {
            Some(Value::Bool(enabled)) => flags.set(flag, *enabled),
            Some(other) => {
                tracing::warn!(%flag, value = %other, "ignoring non-boolean feature flag value");
            }
            None => {}
        }
    }
    flags
}

/// Feature flag state with persistence and presentation.
#[derive(Debug)]
pub struct FlagStore<S, P> {
    storage: S,
    page: P,
    settings: StoreSettings,
    flags: FlagSet,
    unrecognized: BTreeMap<String, bool>,
    tracked: Vec<TrackedEvent>,
}

impl<S: KeyValueStore, P: PageSurface> FlagStore<S, P> {
    /// Create a store holding the defaults, without touching storage or
    /// the page.
    pub const fn new(storage: S, page: P, settings: StoreSettings) -> Self {
        Self {
            storage,
            page,
            settings,
            flags: FlagSet::new(),
            unrecognized: BTreeMap::new(),
            tracked: Vec::new(),
        }
    }

    /// Create a store and bring the page up to date: load the persisted
    /// record, write the merged record back, then apply every flag.
    pub fn open(storage: S, page: P, settings: StoreSettings) -> Self {
        let mut store = Self::new(storage, page, settings);
        store.load();
        store.persist();
        store.apply_all();
        tracing::info!(
            enabled = store.flags.enabled_count(),
            storage_key = store.settings.storage_key,
            "feature flags loaded"
        );
        store
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Load the persisted record and merge it over the defaults.
    ///
    /// Persisted values win per key. A missing key, or one whose value is
    /// not a boolean, keeps its default; unknown keys are ignored. A
    /// missing or unreadable record, or one that is not a JSON object,
    /// leaves the defaults in place.
    pub fn load(&mut self) {
        let key = self.settings.storage_key.as_str();
        self.flags = match storage::load_json::<Value, _>(&self.storage, key) {
            Ok(Some(Value::Object(record))) => merge_record(&record),
            Ok(Some(other)) => {
                tracing::warn!(
                    record = %other,
                    key,
                    "ignoring feature flag record that is not an object"
                );
                FlagSet::default()
            }
            Ok(None) => FlagSet::default(),
            Err(e) => {
                tracing::warn!(error = %e, key, "ignoring unreadable feature flag record");
                FlagSet::default()
            }
        };
        self.unrecognized.clear();
    }

    /// Write the current flags to storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization or the write fails.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let record = PersistedRecord {
            unrecognized: &self.unrecognized,
            flags: &self.flags,
        };
        storage::save_json(&mut self.storage, &self.settings.storage_key, &record)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "failed to persist feature flags");
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Flip `flag`, or set it to `explicit` when given. Persists and
    /// applies the flag's effect; returns the new value.
    pub fn toggle(&mut self, flag: Flag, explicit: Option<bool>) -> bool {
        let enabled = explicit.unwrap_or(!self.flags.get(flag));
        self.flags.set(flag, enabled);
        tracing::debug!(%flag, enabled, "feature flag toggled");

        self.persist();
        self.apply(flag);
        enabled
    }

    /// Toggle by wire key, as the page's checkboxes do.
    ///
    /// A name that is not a [`Flag`] is still recorded and persisted with
    /// the same flip-or-set rule, but has no effect on the page.
    pub fn toggle_by_name(&mut self, name: &str, explicit: Option<bool>) -> bool {
        if let Some(flag) = Flag::from_key(name) {
            return self.toggle(flag, explicit);
        }

        let current = self.unrecognized.get(name).copied().unwrap_or(false);
        let enabled = explicit.unwrap_or(!current);
        self.unrecognized.insert(name.to_owned(), enabled);
        tracing::warn!(name, enabled, "toggled unknown feature flag, no effect applied");

        self.persist();
        enabled
    }

    /// Replace every flag at once. Names recorded by
    /// [`toggle_by_name`](Self::toggle_by_name) are dropped.
    pub fn replace(&mut self, flags: FlagSet) {
        self.flags = flags;
        self.unrecognized.clear();
        self.persist();
        self.apply_all();
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Apply every flag's effect, in enumeration order.
    pub fn apply_all(&mut self) {
        for flag in Flag::ALL {
            self.apply(flag);
        }
    }

    /// Apply `flag`'s effect for its current value.
    ///
    /// Enabled analytics and premium features emit their tracked event on
    /// every call, not only on a transition.
    pub fn apply(&mut self, flag: Flag) {
        let enabled = self.flags.get(flag);
        let page = &self.settings.page;
        match flag {
            Flag::DarkMode => {
                self.page.set_body_class(&page.dark_mode_class, enabled);
            }
            Flag::NewHeader => {
                self.page
                    .set_element_class(&page.title_id, &page.new_header_class, enabled);
                let text = if enabled {
                    &page.new_header_text
                } else {
                    &page.classic_header_text
                };
                self.page.set_text(&page.title_id, text);
            }
            Flag::Analytics => {
                self.page.set_visible(&page.analytics_id, enabled);
                if enabled {
                    self.track(TrackedEventKind::AnalyticsEnabled);
                }
            }
            Flag::PremiumFeatures => {
                self.page.set_visible(&page.premium_id, enabled);
                if enabled {
                    self.track(TrackedEventKind::PremiumFeaturesEnabled);
                }
            }
        }
    }

    /// Set every flag's checkbox to the flag's value.
    pub fn sync_checkboxes(&mut self) {
        for (flag, enabled) in self.flags.iter() {
            self.page.set_checked(flag.key(), enabled);
        }
    }

    fn track(&mut self, kind: TrackedEventKind) {
        tracing::info!(event = %kind, "event tracked");
        self.tracked.push(TrackedEvent::now(kind));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `flag` is enabled.
    pub const fn is_enabled(&self, flag: Flag) -> bool {
        self.flags.get(flag)
    }

    /// Whether the flag or recorded name `name` is enabled; `false` for a
    /// name never seen.
    pub fn is_enabled_by_name(&self, name: &str) -> bool {
        Flag::from_key(name).map_or_else(
            || self.unrecognized.get(name).copied().unwrap_or(false),
            |flag| self.flags.get(flag),
        )
    }

    /// The current flags.
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Names recorded through [`toggle_by_name`](Self::toggle_by_name)
    /// that are not flags.
    pub const fn unrecognized(&self) -> &BTreeMap<String, bool> {
        &self.unrecognized
    }

    /// Events tracked since the store was created or last drained.
    pub fn tracked_events(&self) -> &[TrackedEvent] {
        &self.tracked
    }

    /// Drain the tracked events.
    pub fn take_tracked_events(&mut self) -> Vec<TrackedEvent> {
        std::mem::take(&mut self.tracked)
    }

    /// The page surface.
    pub const fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access to the page surface.
    pub const fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// The storage handle.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The store's settings.
    pub const fn settings(&self) -> &StoreSettings {
        &self.settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::presentation::PageModel;
    use crate::storage::MemoryStorage;

    fn open_with(record: Option<&str>) -> FlagStore<MemoryStorage, PageModel> {
        let storage = record.map_or_else(MemoryStorage::new, |r| {
            MemoryStorage::with_item("featureFlags", r)
        });
        let settings = StoreSettings::default();
        let page = PageModel::standard(&settings.page);
        FlagStore::open(storage, page, settings)
    }

    fn persisted(store: &FlagStore<MemoryStorage, PageModel>) -> serde_json::Value {
        let raw = store.storage().get_item("featureFlags").unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn new_store_does_not_touch_storage() {
        let settings = StoreSettings::default();
        let store = FlagStore::new(MemoryStorage::new(), PageModel::new(), settings);
        assert!(store.storage().is_empty());
        assert_eq!(*store.flags(), FlagSet::default());
    }

    #[test]
    fn open_writes_back_merged_record() {
        let store = open_with(Some(r#"{"newHeader":true,"legacy":1}"#));
        assert_eq!(
            persisted(&store),
            serde_json::json!({
                "darkMode": false,
                "newHeader": true,
                "analytics": false,
                "premiumFeatures": false,
            })
        );
    }

    #[test]
    fn malformed_record_falls_back_to_defaults() {
        for record in ["{not json", "null", "42", r#"{"darkMode":"yes"}"#] {
            let store = open_with(Some(record));
            assert_eq!(*store.flags(), FlagSet::default(), "record: {record}");
        }
    }

    #[test]
    fn bad_value_only_resets_its_own_flag() {
        let store = open_with(Some(r#"{"darkMode":true,"analytics":null,"newHeader":"yes"}"#));
        assert_eq!(*store.flags(), FlagSet::with_enabled(&[Flag::DarkMode]));
        assert!(store.page().body_has_class("dark-mode"));
    }

    /// Storage whose reads and/or writes always fail.
    #[derive(Debug, Default)]
    struct BrokenStorage {
        record: Option<String>,
        fail_reads: bool,
        writes_attempted: usize,
    }

    impl KeyValueStore for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Unavailable("read refused".to_owned()));
            }
            Ok(self.record.clone())
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes_attempted += 1;
            Err(StorageError::Unavailable("quota exceeded".to_owned()))
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_owned()))
        }
    }

    fn open_broken(storage: BrokenStorage) -> FlagStore<BrokenStorage, PageModel> {
        let settings = StoreSettings::default();
        let page = PageModel::standard(&settings.page);
        FlagStore::open(storage, page, settings)
    }

    #[test]
    fn failed_read_loads_defaults() {
        let store = open_broken(BrokenStorage {
            record: Some(r#"{"darkMode":true}"#.to_owned()),
            fail_reads: true,
            ..BrokenStorage::default()
        });
        assert_eq!(*store.flags(), FlagSet::default());
        assert!(!store.page().body_has_class("dark-mode"));
        assert_eq!(
            store.page().text("main-title"),
            Some("Bem-vindo ao Demo TBD")
        );
    }

    #[test]
    fn failed_write_keeps_the_change_in_memory() {
        let mut store = open_broken(BrokenStorage::default());
        let attempts = store.storage().writes_attempted;

        assert!(store.toggle(Flag::DarkMode, None));
        assert!(store.is_enabled(Flag::DarkMode));
        assert!(store.page().body_has_class("dark-mode"));
        assert_eq!(store.storage().writes_attempted, attempts + 1);
        assert!(matches!(store.save(), Err(StorageError::Unavailable(_))));

        store.replace(FlagSet::with_enabled(&[Flag::Analytics]));
        assert_eq!(store.page().is_visible("analytics-section"), Some(true));
        assert!(!store.page().body_has_class("dark-mode"));
    }

    #[test]
    fn dark_mode_toggles_body_class() {
        let mut store = open_with(None);
        assert!(store.toggle(Flag::DarkMode, None));
        assert!(store.page().body_has_class("dark-mode"));
        assert!(!store.toggle(Flag::DarkMode, None));
        assert!(!store.page().body_has_class("dark-mode"));
    }

    #[test]
    fn new_header_swaps_title() {
        let mut store = open_with(None);
        store.toggle(Flag::NewHeader, Some(true));
        let title = store.page().element("main-title").unwrap();
        assert!(title.has_class("new-header"));
        assert_eq!(title.text, "🌟 Bem-vindo ao Futuro do Desenvolvimento!");

        store.toggle(Flag::NewHeader, Some(false));
        let title = store.page().element("main-title").unwrap();
        assert!(!title.has_class("new-header"));
        assert_eq!(title.text, "Bem-vindo ao Demo TBD");
    }

    #[test]
    fn disabling_panels_emits_nothing() {
        let mut store = open_with(Some(r#"{"analytics":true,"premiumFeatures":true}"#));
        store.take_tracked_events();

        store.toggle(Flag::Analytics, Some(false));
        store.toggle(Flag::PremiumFeatures, Some(false));
        assert!(store.tracked_events().is_empty());
        assert_eq!(store.page().is_visible("analytics-section"), Some(false));
        assert_eq!(store.page().is_visible("premium-card"), Some(false));
    }

    #[test]
    fn premium_features_emit_on_every_enabled_apply() {
        let mut store = open_with(None);
        store.toggle(Flag::PremiumFeatures, Some(true));
        store.apply_all();
        let kinds: Vec<TrackedEventKind> =
            store.tracked_events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TrackedEventKind::PremiumFeaturesEnabled,
                TrackedEventKind::PremiumFeaturesEnabled,
            ]
        );
        assert_eq!(store.page().is_visible("premium-card"), Some(true));
    }

    #[test]
    fn open_emits_for_persisted_enabled_panels() {
        let store = open_with(Some(r#"{"analytics":true}"#));
        assert_eq!(store.tracked_events().len(), 1);
        assert_eq!(
            store.tracked_events().first().map(|e| e.kind),
            Some(TrackedEventKind::AnalyticsEnabled)
        );
    }

    #[test]
    fn unknown_name_is_recorded_without_effect() {
        let mut store = open_with(None);
        let before = store.page().clone();

        assert!(store.toggle_by_name("betaSearch", None));
        assert!(store.is_enabled_by_name("betaSearch"));
        assert_eq!(*store.page(), before);
        assert_eq!(persisted(&store)["betaSearch"], serde_json::json!(true));

        assert!(!store.toggle_by_name("betaSearch", None));
        assert!(!store.is_enabled_by_name("betaSearch"));
    }

    #[test]
    fn unknown_names_are_not_reloaded() {
        let mut store = open_with(None);
        store.toggle_by_name("betaSearch", Some(true));
        store.load();
        assert!(store.unrecognized().is_empty());
        assert!(!store.is_enabled_by_name("betaSearch"));
    }

    #[test]
    fn known_name_delegates_to_flag() {
        let mut store = open_with(None);
        assert!(store.toggle_by_name("darkMode", None));
        assert!(store.is_enabled(Flag::DarkMode));
        assert!(store.is_enabled_by_name("darkMode"));
        assert!(store.page().body_has_class("dark-mode"));
    }

    #[test]
    fn replace_drops_unknown_names_and_applies_all() {
        let mut store = open_with(None);
        store.toggle_by_name("betaSearch", Some(true));

        let all = FlagSet::with_enabled(&Flag::ALL);
        store.replace(all);
        assert_eq!(*store.flags(), all);
        assert!(store.unrecognized().is_empty());
        assert!(store.page().body_has_class("dark-mode"));
        assert_eq!(store.page().is_visible("analytics-section"), Some(true));
        assert!(persisted(&store).get("betaSearch").is_none());
    }

    #[test]
    fn sync_checkboxes_mirrors_flags() {
        let mut store = open_with(Some(r#"{"darkMode":true,"analytics":true}"#));
        store.sync_checkboxes();
        assert_eq!(store.page().is_checked("darkMode"), Some(true));
        assert_eq!(store.page().is_checked("newHeader"), Some(false));
        assert_eq!(store.page().is_checked("analytics"), Some(true));
        assert_eq!(store.page().is_checked("premiumFeatures"), Some(false));
    }

    #[test]
    fn custom_storage_key_is_used() {
        let settings = StoreSettings {
            storage_key: "flags-v2".to_owned(),
            ..StoreSettings::default()
        };
        let storage = MemoryStorage::with_item("flags-v2", r#"{"darkMode":true}"#);
        let store = FlagStore::open(storage, PageModel::new(), settings);
        assert!(store.is_enabled(Flag::DarkMode));
        assert_eq!(store.storage().get_item("featureFlags").unwrap(), None);
    }
}
