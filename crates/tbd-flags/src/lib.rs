//! Feature flag store and rollout scenarios for the trunk-based development
//! demo.
//!
//! Four boolean flags drive the page: dark mode, a new header, the
//! analytics section, and the premium panel. The [`FlagStore`] keeps them,
//! persists them to a local key-value store after every change, and applies
//! each flag's effect to the page. The [`ScenarioCatalog`] replaces all four
//! at once with one of four canned sprint presets.
//!
//! # Architecture
//!
//! ```text
//! checkbox / button
//!     |
//!     +-- FlagStore::toggle_by_name --+
//!     |                               +--> KeyValueStore (featureFlags record)
//!     +-- ScenarioCatalog::apply -----+--> PageSurface   (classes, text, display)
//!                                     +--> Notifier      (confirmation toast)
//! ```
//!
//! # Modules
//!
//! - [`config`] -- `tbd-config.yaml` loading into typed structs
//! - [`error`] -- Storage error type
//! - [`presentation`] -- [`PageSurface`] trait and the in-memory [`PageModel`]
//! - [`scenarios`] -- [`ScenarioCatalog`] and its four presets
//! - [`storage`] -- [`KeyValueStore`] trait, memory and file backends
//! - [`store`] -- [`FlagStore`]
//! - [`toast`] -- [`Notifier`] trait and [`ToastBoard`]
//! - `web` -- browser bindings (feature `web`)

pub mod config;
pub mod error;
pub mod presentation;
pub mod scenarios;
pub mod storage;
pub mod store;
pub mod toast;
#[cfg(feature = "web")]
pub mod web;

// Re-export primary types for convenience.
pub use config::{ConfigError, DemoConfig, PageSettings};
pub use error::StorageError;
pub use presentation::{ElementState, PageModel, PageSurface};
pub use scenarios::ScenarioCatalog;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{FlagStore, StoreSettings};
pub use toast::{Notifier, ToastBoard};

impl From<&DemoConfig> for StoreSettings {
    fn from(config: &DemoConfig) -> Self {
        Self {
            storage_key: config.storage.key.clone(),
            page: config.page.clone(),
        }
    }
}
