//! Enumeration types for the feature flag demo.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

/// A feature flag exposed by the demo page.
///
/// The serialized form is the camel-case key used both in the persisted
/// record and as the id of the flag's checkbox (`darkMode`, `newHeader`,
/// `analytics`, `premiumFeatures`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Flag {
    /// Page-wide dark visual mode.
    DarkMode,
    /// Redesigned page title.
    NewHeader,
    /// Analytics section visibility.
    Analytics,
    /// Premium features panel visibility.
    PremiumFeatures,
}

impl Flag {
    /// Every flag, in enumeration order.
    pub const ALL: [Self; 4] = [
        Self::DarkMode,
        Self::NewHeader,
        Self::Analytics,
        Self::PremiumFeatures,
    ];

    /// The wire key of this flag.
    pub const fn key(self) -> &'static str {
        match self {
            Self::DarkMode => "darkMode",
            Self::NewHeader => "newHeader",
            Self::Analytics => "analytics",
            Self::PremiumFeatures => "premiumFeatures",
        }
    }

    /// Look up a flag by its wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.key() == key)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string does not name a known [`Flag`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature flag: {name}")]
pub struct UnknownFlagError {
    /// The name that failed to parse.
    pub name: String,
}

impl FromStr for Flag {
    type Err = UnknownFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownFlagError { name: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Tracked events
// ---------------------------------------------------------------------------

/// An analytics event emitted when a flag's presentation is applied in the
/// enabled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TrackedEventKind {
    /// The analytics section was shown.
    AnalyticsEnabled,
    /// The premium features panel was shown.
    PremiumFeaturesEnabled,
}

impl TrackedEventKind {
    /// The event name as reported to the tracker.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AnalyticsEnabled => "analytics_enabled",
            Self::PremiumFeaturesEnabled => "premium_features_enabled",
        }
    }
}

impl fmt::Display for TrackedEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_serde_names() {
        for flag in Flag::ALL {
            let json = serde_json::to_string(&flag).unwrap();
            assert_eq!(json, format!("\"{}\"", flag.key()));
        }
    }

    #[test]
    fn parses_known_keys() {
        assert_eq!("darkMode".parse::<Flag>().unwrap(), Flag::DarkMode);
        assert_eq!("premiumFeatures".parse::<Flag>().unwrap(), Flag::PremiumFeatures);
        assert_eq!(Flag::from_key("newHeader"), Some(Flag::NewHeader));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = "betaSearch".parse::<Flag>().unwrap_err();
        assert_eq!(err.name, "betaSearch");
        assert_eq!(Flag::from_key("DarkMode"), None);
    }

    #[test]
    fn event_names_match_serde_names() {
        let json = serde_json::to_string(&TrackedEventKind::PremiumFeaturesEnabled).unwrap();
        assert_eq!(json, "\"premium_features_enabled\"");
        assert_eq!(TrackedEventKind::AnalyticsEnabled.to_string(), "analytics_enabled");
    }
}
