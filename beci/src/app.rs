//! Application state and the egui shell around it.

use egui::{Color32, Context, ViewportCommand};

use crate::config::MapConfig;
use crate::controls::{Command, Controls, SHORTCUTS};
use crate::data::Datasets;
use crate::generator::load_mock_data;
use crate::layers::{LayerId, Surface};
use crate::renderer::{MapView, initialize, toggle_layer};
use crate::validation::{DataStats, calculate_data_stats};
use crate::windows::{self, ErrorScreen};

/// Seconds after which the shortcut help closes by itself.
pub const HELP_TIMEOUT: f64 = 5.0;

/// Screens narrower than this get a collapsible sidebar.
pub const NARROW_SCREEN: f32 = 768.0;

/// Everything the application knows, independent of how it is drawn.
pub struct AppState<S: Surface> {
    pub surface: S,
    pub controls: Controls,
    pub stats: DataStats,
    help_opened_at: Option<f64>,
    sidebar_open: bool,
}

impl<S: Surface> AppState<S> {
    pub fn new(mut surface: S, datasets: Datasets) -> Self {
        let geojson = datasets.to_geojson();
        let stats = calculate_data_stats(geojson.iter().map(|(name, value)| (*name, value)));
        log::info!(
            "Loaded {} features, data quality {}%.",
            stats.total_features,
            stats.data_quality
        );

        let controls = Controls::bind(&mut surface, datasets, LayerId::ALL);

        Self {
            surface,
            controls,
            stats,
            help_opened_at: None,
            sidebar_open: false,
        }
    }

    /// Apply a command. Commands which need the window or the map view are given back.
    pub fn dispatch(&mut self, command: Command, now: f64) -> Option<Command> {
        log::trace!("Dispatching {command:?}.");

        match command {
            Command::SetLayer(id, visible) => {
                self.controls.on_change(&mut self.surface, id, visible);
            }
            Command::ToggleLayer(id) => match self.controls.is_checked(id) {
                Some(checked) => self.controls.on_change(&mut self.surface, id, !checked),
                None => {
                    let visible = self.surface.is_visible(id).unwrap_or(false);
                    toggle_layer(&mut self.surface, id, !visible);
                }
            },
            Command::ShowShortcuts => self.help_opened_at = Some(now),
            Command::HideShortcuts => self.help_opened_at = None,
            Command::ClosePopups => self.surface.close_popups(),
            Command::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            Command::ZoomIn | Command::ZoomOut | Command::ToggleFullscreen => return Some(command),
        }

        None
    }

    /// Close the shortcut help once it has been shown long enough.
    pub fn tick(&mut self, now: f64) {
        if let Some(opened_at) = self.help_opened_at {
            if now - opened_at >= HELP_TIMEOUT {
                self.help_opened_at = None;
            }
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help_opened_at.is_some()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }
}

enum Screen {
    Loading { painted: bool },
    Ready(Box<AppState<MapView>>),
    Failed(ErrorScreen),
}

pub struct BeciApp {
    config: MapConfig,
    screen: Screen,
}

impl BeciApp {
    pub fn new(egui_ctx: Context) -> Self {
        Self::with_config(egui_ctx, MapConfig::from_env())
    }

    pub fn with_config(egui_ctx: Context, config: MapConfig) -> Self {
        egui_ctx.request_repaint();
        Self {
            config,
            screen: Screen::Loading { painted: false },
        }
    }
}

fn start(config: &MapConfig, ctx: &Context) -> Screen {
    match initialize(config.clone(), ctx) {
        Ok(view) => Screen::Ready(Box::new(AppState::new(view, load_mock_data()))),
        Err(err) => {
            log::error!("Failed to initialize the map: {err}");
            Screen::Failed(ErrorScreen::from(&err))
        }
    }
}

impl eframe::App for BeciApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let next = match &mut self.screen {
            Screen::Loading { painted } => {
                windows::loading(ctx);
                ctx.request_repaint();
                if *painted {
                    Some(start(&self.config, ctx))
                } else {
                    *painted = true;
                    None
                }
            }
            Screen::Ready(state) => {
                show(state, ctx);
                None
            }
            Screen::Failed(error) => error
                .show(ctx)
                .then_some(Screen::Loading { painted: false }),
        };

        if let Some(next) = next {
            self.screen = next;
        }
    }
}

fn show(state: &mut AppState<MapView>, ctx: &Context) {
    let now = ctx.input(|i| i.time);
    let mut commands = Vec::new();

    if !ctx.wants_keyboard_input() {
        commands.extend(ctx.input(|i| {
            SHORTCUTS
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|(_, command)| *command)
                .collect::<Vec<_>>()
        }));
    }

    let narrow = ctx.available_rect().width() < NARROW_SCREEN;
    if !narrow || state.sidebar_open() {
        egui::SidePanel::left("layers")
            .resizable(false)
            .show(ctx, |ui| sidebar(state, ui, &mut commands));
    }

    let ocean = egui::Frame {
        fill: Color32::from_rgb(0x1e, 0x3a, 0x8a).gamma_multiply(0.1),
        ..Default::default()
    };

    egui::CentralPanel::default().frame(ocean).show(ctx, |ui| {
        if narrow
            && state.sidebar_open()
            && ui.input(|i| i.pointer.primary_clicked())
            && ui.rect_contains_pointer(ui.max_rect())
        {
            state.close_sidebar();
        }

        state.surface.show(ui);

        windows::acknowledge(ui, state.surface.attribution());
        commands.extend(windows::navigation(ui));
        if narrow {
            commands.extend(windows::sidebar_toggle(ui));
        }
        if state.help_visible() {
            commands.extend(windows::shortcuts(ui));
        }
    });

    for command in commands {
        match state.dispatch(command, now) {
            Some(Command::ZoomIn) => state.surface.zoom_in(),
            Some(Command::ZoomOut) => state.surface.zoom_out(),
            Some(Command::ToggleFullscreen) => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                ctx.send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
            }
            _ => {}
        }
    }

    state.tick(now);
    if let Some(opened_at) = state.help_opened_at {
        ctx.request_repaint_after(std::time::Duration::from_secs_f64(
            (opened_at + HELP_TIMEOUT - now).max(0.0),
        ));
    }
}

fn sidebar(state: &AppState<MapView>, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
    ui.heading("🐟 North Pacific");
    ui.label("Salmon and ocean conditions");
    ui.separator();

    for (id, checked) in state.controls.iter() {
        let mut value = checked;
        let response = ui.add_enabled(
            state.surface.has_layer(id),
            egui::Checkbox::new(&mut value, id.title()),
        );
        if response.changed() {
            commands.push(Command::SetLayer(id, value));
        }
    }

    ui.separator();
    ui.label(format!("Features: {}", state.stats.total_features));
    for (kind, count) in &state.stats.feature_types {
        ui.label(format!("{kind}: {count}"));
    }
    ui.label(format!("Data quality: {}%", state.stats.data_quality));

    ui.separator();
    if ui.small_button("⌨ Shortcuts").clicked() {
        commands.push(Command::ShowShortcuts);
    }
}
