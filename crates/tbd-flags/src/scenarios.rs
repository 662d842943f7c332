//! Canned rollout scenarios.
//!
//! Each scenario is a complete [`FlagSet`] standing for one sprint of a
//! trunk-based rollout, from "nothing released" to "everything released".
//! Applying one replaces the store's flags wholesale.

use tbd_types::{Flag, FlagSet, ScenarioPreset};

use crate::presentation::PageSurface;
use crate::storage::KeyValueStore;
use crate::store::FlagStore;
use crate::toast::Notifier;

/// The ordered list of scenario presets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCatalog {
    presets: Vec<ScenarioPreset>,
}

impl ScenarioCatalog {
    /// The four stock scenarios, in rollout order.
    pub fn standard() -> Self {
        let presets = vec![
            ScenarioPreset::new(
                "Desenvolvimento Inicial",
                "Apenas recursos básicos disponíveis",
                FlagSet::new(),
            ),
            ScenarioPreset::new(
                "Sprint 1 - Melhorias de UI",
                "Modo escuro e novo cabeçalho implementados",
                FlagSet::with_enabled(&[Flag::DarkMode, Flag::NewHeader]),
            ),
            ScenarioPreset::new(
                "Sprint 2 - Analytics",
                "Sistema de analytics adicionado",
                FlagSet::with_enabled(&[Flag::DarkMode, Flag::NewHeader, Flag::Analytics]),
            ),
            ScenarioPreset::new(
                "Sprint 3 - Recursos Premium",
                "Funcionalidades premium liberadas",
                FlagSet::with_enabled(&Flag::ALL),
            ),
        ];
        Self { presets }
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// The scenario at `index`.
    pub fn get(&self, index: usize) -> Option<&ScenarioPreset> {
        self.presets.get(index)
    }

    /// All scenarios, in order.
    pub fn presets(&self) -> &[ScenarioPreset] {
        &self.presets
    }

    /// Iterate over the scenarios in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioPreset> {
        self.presets.iter()
    }

    /// Apply the scenario at `index`.
    ///
    /// Replaces the store's flags with the scenario's, which persists and
    /// re-applies every effect, then syncs the checkboxes and confirms
    /// through `notifier`. An index out of range does nothing and returns
    /// `None`.
    pub fn apply<S, P, N>(
        &self,
        index: usize,
        store: &mut FlagStore<S, P>,
        notifier: &mut N,
    ) -> Option<&ScenarioPreset>
    where
        S: KeyValueStore,
        P: PageSurface,
        N: Notifier + ?Sized,
    {
        let Some(preset) = self.get(index) else {
            tracing::debug!(index, available = self.len(), "ignoring unknown scenario");
            return None;
        };

        store.replace(preset.flags);
        store.sync_checkboxes();
        notifier.show_message(&format!("Cenário aplicado: {}", preset.name));

        tracing::info!(index, scenario = preset.name, "scenario applied");
        Some(preset)
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalog {
    type Item = &'a ScenarioPreset;
    type IntoIter = std::slice::Iter<'a, ScenarioPreset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
