//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Identifiers use UUID v7 (time-ordered).

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a toast notification.
///
/// A delayed dismissal carries the id of the toast it was scheduled for,
/// so it can never remove a toast that replaced it in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToastId(pub Uuid);

impl ToastId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ToastId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ToastId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ToastId> for Uuid {
    fn from(id: ToastId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let first = ToastId::new();
        let second = ToastId::new();
        assert_ne!(first, second);
        assert_eq!(first.into_inner().get_version_num(), 7);
    }

    #[test]
    fn round_trips_through_uuid() {
        let id = ToastId::new();
        let raw: Uuid = id.into();
        assert_eq!(ToastId::from(raw), id);
        assert_eq!(id.into_inner(), raw);
    }
}
