use crate::atom::catalog::{self, ElementEntry};
use crate::atom::rotation;
use crate::atom::shell::ShellGroup;
use log::warn;

/// The currently selected element and its three built shell groups.
///
/// Selection swaps are a full teardown: all three groups are rebuilt from
/// the catalog entry and their animation phase resets to identity.
#[derive(Clone, Debug)]
pub struct AtomModel {
    entry: &'static ElementEntry,
    shells: [ShellGroup; 3],
}

impl AtomModel {
    pub fn new() -> Self {
        Self::from_entry(catalog::default_entry())
    }

    fn from_entry(entry: &'static ElementEntry) -> Self {
        Self {
            entry,
            shells: [
                ShellGroup::build(entry.electron),
                ShellGroup::build(entry.proton),
                ShellGroup::build(entry.neutron),
            ],
        }
    }

    pub fn entry(&self) -> &'static ElementEntry {
        self.entry
    }

    /// Shell groups in render order: electron, proton, neutron.
    pub fn shells(&self) -> &[ShellGroup; 3] {
        &self.shells
    }

    /// Switches to another catalog entry, rebuilding every group.
    ///
    /// An unknown symbol leaves the model untouched; the picker only
    /// offers catalog-backed symbols, so hitting this is a caller bug.
    pub fn select(&mut self, symbol: &str) -> bool {
        match catalog::lookup(symbol) {
            Some(entry) => {
                *self = Self::from_entry(entry);
                true
            }
            None => {
                warn!(
                    "unknown element symbol {symbol:?}; keeping {}",
                    self.entry.symbol
                );
                false
            }
        }
    }

    /// Per-frame rotation step for all three groups.
    pub fn advance(&mut self) {
        for shell in &mut self.shells {
            rotation::advance(shell);
        }
    }
}

impl Default for AtomModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn particle_counts(model: &AtomModel) -> [usize; 3] {
        let shells = model.shells();
        [
            shells[0].particles.len(),
            shells[1].particles.len(),
            shells[2].particles.len(),
        ]
    }

    #[test]
    fn defaults_to_hydrogen() {
        let model = AtomModel::new();
        assert_eq!(model.entry().symbol, "H");
        assert_eq!(particle_counts(&model), [1, 1, 0]);
    }

    #[test]
    fn selection_replaces_every_shell_group() {
        let mut model = AtomModel::new();
        assert!(model.select("Mg"));
        assert_eq!(model.entry().symbol, "Mg");
        assert_eq!(particle_counts(&model), [12, 12, 12]);
    }

    #[test]
    fn selection_resets_animation_phase() {
        let mut model = AtomModel::new();
        for _ in 0..100 {
            model.advance();
        }
        assert!(model.select("C"));
        for shell in model.shells() {
            assert_eq!(shell.rotation, Quat::IDENTITY);
        }
    }

    #[test]
    fn selecting_carbon_yields_six_of_each() {
        let mut model = AtomModel::new();
        assert!(model.select("C"));
        assert_eq!(particle_counts(&model), [6, 6, 6]);
        assert_eq!(model.entry().atomic_number, "6");
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let mut model = AtomModel::new();
        assert!(!model.select("Xx"));
        assert_eq!(model.entry().symbol, "H");
        assert_eq!(particle_counts(&model), [1, 1, 0]);
    }

    #[test]
    fn advance_moves_every_occupied_shell() {
        let mut model = AtomModel::new();
        model.advance();
        for shell in model.shells() {
            assert_ne!(shell.rotation, Quat::IDENTITY);
        }
    }
}
