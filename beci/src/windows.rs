use egui::{Align2, Color32, Context, Grid, RichText, Ui, Window};
use walkers::sources::Attribution;

use crate::controls::{Command, SHORTCUTS};
use crate::renderer::RenderSurfaceError;

pub fn acknowledge(ui: &Ui, attribution: Attribution) {
    Window::new("Acknowledge")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_BOTTOM, [-10., -10.])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                ui.label("map data");
                ui.hyperlink_to(attribution.text, attribution.url);
            });
        });
}

/// Navigation buttons in the corner of the map.
pub fn navigation(ui: &Ui) -> Option<Command> {
    let mut command = None;

    Window::new("Navigation")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_TOP, [-10., 10.])
        .show(ui.ctx(), |ui| {
            ui.vertical(|ui| {
                if ui.button(RichText::new("➕").heading()).clicked() {
                    command = Some(Command::ZoomIn);
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    command = Some(Command::ZoomOut);
                }

                if ui
                    .button(RichText::new("⛶").heading())
                    .on_hover_text("Fullscreen")
                    .clicked()
                {
                    command = Some(Command::ToggleFullscreen);
                }
            });
        });

    command
}

/// Button revealing the sidebar on narrow screens.
pub fn sidebar_toggle(ui: &Ui) -> Option<Command> {
    let mut command = None;

    Window::new("Sidebar")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_TOP, [10., 10.])
        .show(ui.ctx(), |ui| {
            if ui.button(RichText::new("☰ Layers").heading()).clicked() {
                command = Some(Command::ToggleSidebar);
            }
        });

    command
}

fn describe(command: Command) -> String {
    match command {
        Command::ToggleLayer(id) => format!("Toggle {}", id.title()),
        Command::ShowShortcuts => "Show this help".to_owned(),
        Command::ClosePopups => "Close popups".to_owned(),
        other => format!("{other:?}"),
    }
}

fn key_name(key: egui::Key) -> &'static str {
    match key {
        egui::Key::Escape => "Esc",
        other => other.name(),
    }
}

pub fn shortcuts(ui: &Ui) -> Option<Command> {
    let mut command = None;

    Window::new("Keyboard Shortcuts")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0., 0.])
        .show(ui.ctx(), |ui| {
            Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
                for (key, shortcut) in SHORTCUTS {
                    ui.strong(key_name(key));
                    ui.label(describe(shortcut));
                    ui.end_row();
                }
            });

            if ui.button("Close").clicked() {
                command = Some(Command::HideShortcuts);
            }
        });

    command
}

pub fn loading(ctx: &Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.centered_and_justified(|ui| {
            ui.horizontal_centered(|ui| {
                ui.spinner();
                ui.heading("Loading ocean data...");
            });
        });
    });
}

/// Full window replacement shown when the map could not be created.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorScreen {
    pub message: String,
}

impl From<&RenderSurfaceError> for ErrorScreen {
    fn from(err: &RenderSurfaceError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl ErrorScreen {
    /// Returns `true` when user asks to reload.
    pub fn show(&self, ctx: &Context) -> bool {
        let mut reload = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                ui.heading(RichText::new("Error Loading Map").color(Color32::from_rgb(0xe7, 0x4c, 0x3c)));
                ui.label(&self.message);
                ui.add_space(10.0);
                if ui.button("Reload").clicked() {
                    reload = true;
                }
            });
        });

        reload
    }
}
