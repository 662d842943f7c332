//! The demo session: one flag store, the scenario catalog, and the toast
//! board, driven by [`Command`]s.
//!
//! The session is the explicit context the page's global objects used to
//! be. It owns everything a command touches, so each command runs to
//! completion against a consistent state.

use chrono::{DateTime, Utc};
use tbd_flags::{FlagStore, KeyValueStore, PageModel, ScenarioCatalog, ToastBoard};
use tbd_types::{Toast, ToastId};

use crate::commands::{Command, HELP};

/// What the command loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text (possibly empty) and read the next command.
    Continue(String),
    /// Stop reading commands.
    Quit,
}

/// A running demo.
///
/// Tracked events are drained from the store after every command; only
/// their running count is kept.
#[derive(Debug)]
pub struct Session<S> {
    store: FlagStore<S, PageModel>,
    catalog: ScenarioCatalog,
    toasts: ToastBoard,
    events_tracked: usize,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session over an opened store and bring the checkboxes in
    /// line with the loaded flags.
    pub fn start(
        mut store: FlagStore<S, PageModel>,
        catalog: ScenarioCatalog,
        toasts: ToastBoard,
    ) -> Self {
        store.sync_checkboxes();
        let events_tracked = store.take_tracked_events().len();
        Self {
            store,
            catalog,
            toasts,
            events_tracked,
        }
    }

    /// Run one command.
    pub fn handle(&mut self, command: Command) -> Reply {
        let toast_before = self.toasts.current().map(|t| t.id);
        let mut out = match command {
            Command::Toggle { name, value } => self.toggle(&name, value),
            Command::Scenario(index) => {
                self.apply_scenario(index);
                String::new()
            }
            Command::Scenarios => self.list_scenarios(),
            Command::Status => self.status(),
            Command::Help => HELP.to_owned(),
            Command::Quit => return Reply::Quit,
        };
        self.events_tracked += self.store.take_tracked_events().len();

        if let Some(toast) = self.new_toast(toast_before) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("[toast] ");
            out.push_str(&toast.message);
        }
        Reply::Continue(out)
    }

    fn toggle(&mut self, name: &str, value: Option<bool>) -> String {
        let enabled = self.store.toggle_by_name(name, value);
        // The checkbox that was clicked already shows the new value.
        self.store.sync_checkboxes();
        format!("{name} = {}", on_off(enabled))
    }

    fn apply_scenario(&mut self, index: i64) {
        match usize::try_from(index) {
            Ok(index) => {
                self.catalog.apply(index, &mut self.store, &mut self.toasts);
            }
            Err(_) => tracing::debug!(index, "ignoring negative scenario index"),
        }
    }

    fn list_scenarios(&self) -> String {
        let lines: Vec<String> = self
            .catalog
            .iter()
            .enumerate()
            .map(|(index, preset)| {
                let enabled: Vec<String> = preset
                    .flags
                    .iter()
                    .filter(|&(_, on)| on)
                    .map(|(flag, _)| flag.to_string())
                    .collect();
                format!(
                    "{index}: {} -- {} [{}]",
                    preset.name,
                    preset.description,
                    enabled.join(", ")
                )
            })
            .collect();
        lines.join("\n")
    }

    fn status(&self) -> String {
        let mut lines: Vec<String> = self
            .store
            .flags()
            .iter()
            .map(|(flag, enabled)| format!("{flag}: {}", on_off(enabled)))
            .collect();
        for (name, &enabled) in self.store.unrecognized() {
            lines.push(format!("{name}: {} (unknown flag)", on_off(enabled)));
        }
        lines.push(format!("events tracked: {}", self.events_tracked));
        if let Some(toast) = self.toasts.current() {
            lines.push(format!("toast: {}", toast.message));
        }
        lines.push(self.store.page().render().trim_end().to_owned());
        lines.join("\n")
    }

    fn new_toast(&self, before: Option<ToastId>) -> Option<&Toast> {
        self.toasts.current().filter(|t| Some(t.id) != before)
    }

    /// Remove the visible toast if it has expired at `now`.
    pub fn expire_toast(&mut self, now: DateTime<Utc>) -> Option<Toast> {
        self.toasts.expire(now)
    }

    /// Remove the visible toast as of its own deadline, once a timer has
    /// run for its full duration.
    pub fn expire_due_toast(&mut self) -> Option<Toast> {
        let due = self.toasts.current()?.expires_at;
        self.expire_toast(due)
    }

    /// The toast board.
    pub const fn toasts(&self) -> &ToastBoard {
        &self.toasts
    }

    /// The flag store.
    pub const fn store(&self) -> &FlagStore<S, PageModel> {
        &self.store
    }

    /// Events tracked since the session started.
    pub const fn events_tracked(&self) -> usize {
        self.events_tracked
    }
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
