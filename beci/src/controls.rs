//! Layer toggles and keyboard shortcuts, kept in sync with the map surface.

use std::collections::BTreeMap;

use egui::Key;

use crate::data::Datasets;
use crate::layers::{LayerId, Surface};
use crate::renderer::{add_data_layers, toggle_layer};

/// Checkboxes of the sidebar, one per known layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    toggles: BTreeMap<LayerId, bool>,
}

impl Controls {
    /// Put the datasets on the surface and create a toggle for each of `known` layers. Toggles
    /// start checked if their layer is visible.
    pub fn bind(
        surface: &mut impl Surface,
        datasets: Datasets,
        known: impl IntoIterator<Item = LayerId>,
    ) -> Self {
        add_data_layers(surface, datasets);

        let toggles = known
            .into_iter()
            .map(|id| (id, surface.is_visible(id).unwrap_or(false)))
            .collect();

        Self { toggles }
    }

    /// User (un)checked a toggle.
    pub fn on_change(&mut self, surface: &mut impl Surface, id: LayerId, checked: bool) {
        match self.toggles.get_mut(&id) {
            Some(toggle) => *toggle = checked,
            None => log::debug!("There is no toggle for '{id}'."),
        }
        toggle_layer(surface, id, checked);
    }

    pub fn get_states(&self) -> BTreeMap<LayerId, bool> {
        self.toggles.clone()
    }

    /// Apply saved states to the layers and their toggles. States of unknown toggles are
    /// ignored.
    pub fn set_states(&mut self, surface: &mut impl Surface, states: &BTreeMap<LayerId, bool>) {
        for (&id, &visible) in states {
            toggle_layer(surface, id, visible);
            if let Some(toggle) = self.toggles.get_mut(&id) {
                *toggle = visible;
            }
        }
    }

    pub fn is_checked(&self, id: LayerId) -> Option<bool> {
        self.toggles.get(&id).copied()
    }

    /// Toggles in the sidebar order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, bool)> + '_ {
        self.toggles.iter().map(|(&id, &checked)| (id, checked))
    }
}

/// Everything user can ask for, by clicking or typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetLayer(LayerId, bool),
    ToggleLayer(LayerId),
    ShowShortcuts,
    HideShortcuts,
    ClosePopups,
    ToggleSidebar,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
}

/// Keys and what they do. Numbers follow the order of the toggles.
pub const SHORTCUTS: [(Key, Command); 6] = [
    (Key::Num1, Command::ToggleLayer(LayerId::SalmonPopulations)),
    (Key::Num2, Command::ToggleLayer(LayerId::MigrationCorridors)),
    (Key::Num3, Command::ToggleLayer(LayerId::TemperatureAnomalies)),
    (Key::Num4, Command::ToggleLayer(LayerId::MonitoringStations)),
    (Key::H, Command::ShowShortcuts),
    (Key::Escape, Command::ClosePopups),
];

pub fn command_for_key(key: Key) -> Option<Command> {
    SHORTCUTS
        .iter()
        .find(|(shortcut, _)| *shortcut == key)
        .map(|(_, command)| *command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_toggle_layers_in_order() {
        let toggled: Vec<_> = [Key::Num1, Key::Num2, Key::Num3, Key::Num4]
            .into_iter()
            .filter_map(command_for_key)
            .collect();

        assert_eq!(
            toggled,
            LayerId::ALL.map(Command::ToggleLayer).to_vec(),
        );
    }

    #[test]
    fn help_and_escape() {
        assert_eq!(command_for_key(Key::H), Some(Command::ShowShortcuts));
        assert_eq!(command_for_key(Key::Escape), Some(Command::ClosePopups));
        assert_eq!(command_for_key(Key::Q), None);
    }
}
