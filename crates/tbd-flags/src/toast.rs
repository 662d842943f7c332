//! One-shot confirmation messages.
//!
//! At most one toast is visible. Showing a new one removes the old one
//! first; each toast carries its own expiry and a [`ToastId`] so that a
//! delayed dismissal scheduled for an old toast never removes its
//! replacement.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tbd_types::{Toast, ToastId};

/// Something that can show a user-visible message.
pub trait Notifier {
    /// Show `message`, replacing any message still visible.
    fn show_message(&mut self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn show_message(&mut self, message: &str) {
        (**self).show_message(message);
    }
}

/// Holds the visible toast, if any.
#[derive(Debug, Clone)]
pub struct ToastBoard {
    duration: Duration,
    current: Option<Toast>,
}

impl ToastBoard {
    /// Create an empty board whose toasts stay visible for `duration`.
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    /// How long each toast stays visible.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Show `message` as of `now`, removing any visible toast first.
    pub fn show_at(&mut self, message: &str, now: DateTime<Utc>) -> &Toast {
        if let Some(previous) = self.current.take() {
            tracing::debug!(id = %previous.id, "toast preempted");
        }

        let lifetime = chrono::Duration::from_std(self.duration).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);
        tracing::info!(text = message, "showing toast");

        self.current.insert(Toast {
            id: ToastId::new(),
            message: message.to_owned(),
            shown_at: now,
            expires_at,
        })
    }

    /// Show `message` now.
    pub fn show(&mut self, message: &str) -> &Toast {
        self.show_at(message, Utc::now())
    }

    /// Remove the visible toast if it is the one identified by `id`.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        if self.current.as_ref().is_some_and(|t| t.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Remove and return the visible toast if it has expired at `now`.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Option<Toast> {
        if self.current.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.current.take()
        } else {
            None
        }
    }

    /// The visible toast.
    pub const fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Time left before the visible toast expires, or `None` when no toast
    /// is visible. Zero once the expiry has passed.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|t| (t.expires_at - now).to_std().unwrap_or(Duration::ZERO))
    }
}

impl Notifier for ToastBoard {
    fn show_message(&mut self, message: &str) {
        self.show(message);
    }
}
