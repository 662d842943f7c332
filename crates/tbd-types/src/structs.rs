//! Core structs: flag sets, scenario presets, tracked events, and toasts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Flag, TrackedEventKind};
use crate::ids::ToastId;

// ---------------------------------------------------------------------------
// Flag set
// ---------------------------------------------------------------------------

/// The value of every feature flag.
///
/// All four flags are always present. Deserialization merges over the
/// defaults: a missing key keeps its default (`false`) and unknown keys are
/// ignored, so a record written by an older or newer page still loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
#[allow(clippy::struct_excessive_bools)]
pub struct FlagSet {
    /// Page-wide dark visual mode.
    pub dark_mode: bool,
    /// Redesigned page title.
    pub new_header: bool,
    /// Analytics section visibility.
    pub analytics: bool,
    /// Premium features panel visibility.
    pub premium_features: bool,
}

impl FlagSet {
    /// A flag set with every flag disabled.
    pub const fn new() -> Self {
        Self {
            dark_mode: false,
            new_header: false,
            analytics: false,
            premium_features: false,
        }
    }

    /// A flag set with exactly the given flags enabled.
    pub fn with_enabled(flags: &[Flag]) -> Self {
        let mut set = Self::new();
        for &flag in flags {
            set.set(flag, true);
        }
        set
    }

    /// The value of `flag`.
    pub const fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::DarkMode => self.dark_mode,
            Flag::NewHeader => self.new_header,
            Flag::Analytics => self.analytics,
            Flag::PremiumFeatures => self.premium_features,
        }
    }

    /// Set `flag` to `enabled`.
    pub const fn set(&mut self, flag: Flag, enabled: bool) {
        match flag {
            Flag::DarkMode => self.dark_mode = enabled,
            Flag::NewHeader => self.new_header = enabled,
            Flag::Analytics => self.analytics = enabled,
            Flag::PremiumFeatures => self.premium_features = enabled,
        }
    }

    /// Every flag with its value, in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        Flag::ALL.into_iter().map(|flag| (flag, self.get(flag)))
    }

    /// Number of enabled flags.
    pub fn enabled_count(&self) -> usize {
        self.iter().filter(|&(_, enabled)| enabled).count()
    }
}

// ---------------------------------------------------------------------------
// Scenario presets
// ---------------------------------------------------------------------------

/// A named bundle of flag values representing one phase of a rollout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScenarioPreset {
    /// Short display name, shown in the confirmation toast.
    pub name: String,
    /// One-line description of what the phase delivers.
    pub description: String,
    /// The complete flag set this scenario applies.
    pub flags: FlagSet,
}

impl ScenarioPreset {
    /// Create a preset.
    pub fn new(name: impl Into<String>, description: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            flags,
        }
    }
}

// ---------------------------------------------------------------------------
// Tracked events
// ---------------------------------------------------------------------------

/// An analytics event recorded by the flag store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrackedEvent {
    /// Which event fired.
    pub kind: TrackedEventKind,
    /// When it fired.
    pub tracked_at: DateTime<Utc>,
}

impl TrackedEvent {
    /// Record `kind` as happening now.
    pub fn now(kind: TrackedEventKind) -> Self {
        Self {
            kind,
            tracked_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

/// A transient confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Toast {
    /// Identifier used to match a delayed dismissal to this toast.
    pub id: ToastId,
    /// Message text.
    pub message: String,
    /// When the toast was shown.
    pub shown_at: DateTime<Utc>,
    /// When the toast removes itself.
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    /// Whether the toast has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
