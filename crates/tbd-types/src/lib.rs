//! Shared type definitions for the trunk-based development demo.
//!
//! This crate is the single source of truth for the flag, scenario, event,
//! and toast types. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the demo page.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers
//! - [`enums`] -- [`Flag`] and [`TrackedEventKind`]
//! - [`structs`] -- [`FlagSet`], [`ScenarioPreset`], [`TrackedEvent`], [`Toast`]

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Flag, TrackedEventKind, UnknownFlagError};
pub use ids::ToastId;
pub use structs::{FlagSet, ScenarioPreset, Toast, TrackedEvent};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        let _ = crate::ids::ToastId::export_all();

        let _ = crate::enums::Flag::export_all();
        let _ = crate::enums::TrackedEventKind::export_all();

        let _ = crate::structs::FlagSet::export_all();
        let _ = crate::structs::ScenarioPreset::export_all();
        let _ = crate::structs::TrackedEvent::export_all();
        let _ = crate::structs::Toast::export_all();
    }
}
