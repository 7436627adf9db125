use std::sync::mpsc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::Layout;
use rand::seq::SliceRandom;

use crate::audio::player::AmbiencePlayer;
use crate::engine::engine::Engine;
use crate::engine::llm_client::HttpStoryModel;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::game_save;
use crate::model::message::Message;
use crate::model::player::{CharacterClass, Item};
use crate::model::scene_image::SceneImage;
use crate::model::screen::Screen;
use crate::model::session::GameSession;
use crate::ui::scene_image::{IconTextures, SceneTexture};
use crate::ui::settings::{AppSettings, UiSettings};
use crate::ui::settings_io;
use crate::ui::typewriter::Typewriter;
use crate::ui::{center_panel, character_creation, left_panel, right_panel, windows};

const LOADING_MESSAGES: &[&str] = &[
    "Forging your destiny in the arcane mists...",
    "The Dungeon Master is crafting your destiny...",
    "Unrolling ancient maps...",
    "Lighting the torches...",
];

const REPAINT_INTERVAL: Duration = Duration::from_millis(50);

/* =========================
   Tabs
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftTab {
    #[default]
    Game,
    Settings,
}

/* =========================
   UI State
   ========================= */

#[derive(Clone)]
pub struct StatusLine {
    pub message: String,
    pub success: bool,
}

/// Everything a view may ask for. Views only push these; `GameApp` acts.
pub enum UiAction {
    Begin { name: String, class: CharacterClass },
    Act(String),
    Inspect(Item),
    FetchIcon(Item),
    QuickSave,
    QuickLoad,
    Restart,
    ToggleMute,
    SetVolume(f32),
    SaveSettings,
}

#[derive(Default)]
pub struct UiState {
    pub char_name: String,
    pub char_class: CharacterClass,
    pub input_text: String,
    pub should_auto_scroll: bool,

    pub left_tab: LeftTab,
    pub show_log: bool,
    pub show_inventory: bool,

    pub status: Option<StatusLine>,
    pub loading_message: &'static str,
}

/* =========================
   App
   ========================= */

pub struct GameApp {
    pub ui: UiState,
    pub session: GameSession,
    pub settings: AppSettings,

    scene_texture: SceneTexture,
    icon_textures: IconTextures,
    typewriter: Typewriter,
    audio: AmbiencePlayer,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl GameApp {
    pub fn new(settings: AppSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let model = HttpStoryModel::new(settings.llm.clone());
        let images_enabled = settings.llm.images_enabled;
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, Box::new(model), images_enabled);
            engine.run();
        });

        let audio = AmbiencePlayer::spawn(&settings.audio);

        Self {
            ui: UiState {
                loading_message: LOADING_MESSAGES[0],
                ..Default::default()
            },
            session: GameSession::default(),
            settings,
            scene_texture: SceneTexture::default(),
            icon_textures: IconTextures::default(),
            typewriter: Typewriter::default(),
            audio,
            cmd_tx,
            resp_rx,
        }
    }

    fn send_command(&mut self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("engine thread is gone");
            self.session
                .apply_failure("The Dungeon Master has left the table. Please restart the game.");
        }
    }

    fn handle_response(&mut self, resp: EngineResponse) {
        match resp {
            EngineResponse::TurnCompleted { generation, result } => {
                if !self.session.is_current(generation) {
                    tracing::debug!(generation, "dropping answer to an abandoned request");
                    return;
                }
                match result {
                    Ok(turn) => {
                        let outcome = self.session.apply_turn(turn);
                        tracing::info!(?outcome, screen = ?self.session.screen, "turn applied");
                        self.audio.play_scene(self.session.scene_type());
                    }
                    Err(message) => self.session.apply_failure(message),
                }
                self.ui.should_auto_scroll = true;
            }
            EngineResponse::ImageReady { generation, image } => {
                if self.session.is_current(generation) {
                    self.session.apply_image(image);
                }
            }
            EngineResponse::ItemHint {
                generation,
                item,
                hint,
            } => {
                if self.session.is_current(generation) {
                    self.session.apply_item_hint(item, hint, Instant::now());
                }
            }
            EngineResponse::ItemIcon {
                generation,
                item,
                icon,
            } => {
                if self.session.is_current(generation) {
                    self.session.apply_item_icon(item, icon);
                }
            }
        }
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Begin { name, class } => {
                if let Some(request) = self.session.begin(&name, class) {
                    self.ui.loading_message = LOADING_MESSAGES
                        .choose(&mut rand::thread_rng())
                        .copied()
                        .unwrap_or(LOADING_MESSAGES[0]);
                    self.reset_views();
                    self.audio.start();
                    let generation = self.session.generation();
                    self.send_command(EngineCommand::Turn {
                        generation,
                        request,
                    });
                }
            }
            UiAction::Act(text) => {
                if let Some(request) = self.session.submit_action(&text) {
                    self.ui.input_text.clear();
                    self.ui.should_auto_scroll = true;
                    let generation = self.session.generation();
                    self.send_command(EngineCommand::Turn {
                        generation,
                        request,
                    });
                }
            }
            UiAction::Inspect(item) => {
                if !self.session.request_item_hint(&item.name, Instant::now()) {
                    return;
                }
                let generation = self.session.generation();
                let player = self.session.player.clone();
                self.send_command(EngineCommand::InspectItem {
                    generation,
                    item,
                    player,
                });
            }
            UiAction::FetchIcon(item) => {
                if !self.session.request_item_icon(&item.name) {
                    return;
                }
                if self.settings.llm.images_enabled {
                    let generation = self.session.generation();
                    self.send_command(EngineCommand::ItemIcon { generation, item });
                } else {
                    self.session.apply_item_icon(item.name, SceneImage::placeholder());
                }
            }
            UiAction::QuickSave => self.quick_save(),
            UiAction::QuickLoad => self.quick_load(),
            UiAction::Restart => {
                self.session.restart();
                self.reset_views();
            }
            UiAction::ToggleMute => {
                self.audio.toggle_mute();
            }
            UiAction::SetVolume(volume) => {
                self.settings.audio.volume = volume;
                self.audio.set_volume(volume);
            }
            UiAction::SaveSettings => {
                self.ui.status = Some(match settings_io::save_settings(&self.settings) {
                    Ok(()) => status("Settings saved.", true),
                    Err(e) => {
                        tracing::warn!("saving settings failed: {e:#}");
                        status(format!("Could not save settings: {e}"), false)
                    }
                });
            }
        }
    }

    fn quick_save(&mut self) {
        if self.session.screen == Screen::CharacterCreation {
            return;
        }
        self.ui.status = Some(match game_save::quick_save(&self.session.snapshot()) {
            Ok(_) => status("Game saved.", true),
            Err(e) => {
                tracing::warn!("quick-save failed: {e:#}");
                status(format!("Save failed: {e}"), false)
            }
        });
    }

    fn quick_load(&mut self) {
        self.ui.status = Some(match game_save::quick_load() {
            Ok(save) => {
                self.session.restore(save);
                self.reset_views();
                self.ui.should_auto_scroll = true;
                if self.session.screen != Screen::CharacterCreation {
                    self.audio.start();
                    self.audio.play_scene(self.session.scene_type());
                }
                status("Game loaded.", true)
            }
            Err(e) => {
                tracing::warn!("quick-load failed: {e:#}");
                status(format!("Load failed: {e}"), false)
            }
        });
    }

    fn reset_views(&mut self) {
        self.typewriter = Typewriter::default();
        self.icon_textures.clear();
    }

    fn shortcuts(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F5) {
                actions.push(UiAction::QuickSave);
            }
            if i.key_pressed(egui::Key::F9) {
                actions.push(UiAction::QuickLoad);
            }
        });
    }

    fn draw_navbar(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let muted = self.audio.is_muted();
        egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Ember Tales");
                ui.separator();

                let in_game = self.session.screen != Screen::CharacterCreation;
                if ui.add_enabled(in_game, egui::Button::new("📜 Log")).clicked() {
                    self.ui.show_log = !self.ui.show_log;
                }
                if ui.add_enabled(in_game, egui::Button::new("🎒 Inventory")).clicked() {
                    self.ui.show_inventory = !self.ui.show_inventory;
                }

                let mute_label = if muted { "🔇" } else { "🔊" };
                if ui.button(mute_label).on_hover_text("Toggle ambience").clicked() {
                    actions.push(UiAction::ToggleMute);
                }

                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Load (F9)").clicked() {
                        actions.push(UiAction::QuickLoad);
                    }
                    if ui.add_enabled(in_game, egui::Button::new("Save (F5)")).clicked() {
                        actions.push(UiAction::QuickSave);
                    }
                    if let Some(s) = &self.ui.status {
                        let color = if s.success {
                            egui::Color32::LIGHT_GREEN
                        } else {
                            egui::Color32::LIGHT_RED
                        };
                        ui.label(egui::RichText::new(&s.message).color(color));
                    }
                });
            });
        });
    }

    fn draw_loading(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                ui.add(egui::Spinner::new().size(48.0));
                ui.add_space(12.0);
                ui.label(egui::RichText::new(self.ui.loading_message).italics().size(18.0));
            });
        });
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for GameApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            self.handle_response(resp);
        }

        let mut actions = Vec::new();
        self.shortcuts(ctx, &mut actions);
        self.draw_navbar(ctx, &mut actions);

        match self.session.screen {
            Screen::CharacterCreation => {
                character_creation::draw(ctx, &mut self.ui, &self.session, &mut actions);
            }
            Screen::Loading => self.draw_loading(ctx),
            Screen::Exploring | Screen::InCombat | Screen::GameOver => {
                left_panel::draw_left_panel(ctx, &mut self.ui, &mut self.settings, &mut actions);
                right_panel::draw_right_panel(ctx, &self.session, &mut actions);
                center_panel::draw_center_panel(
                    ctx,
                    &mut self.ui,
                    &self.session,
                    &mut self.scene_texture,
                    &mut self.typewriter,
                    &self.settings.ui,
                    &mut actions,
                );
                windows::draw_log_window(ctx, &mut self.ui.show_log, &self.session);
                windows::draw_inventory_window(
                    ctx,
                    &mut self.ui.show_inventory,
                    &self.session,
                    &mut self.icon_textures,
                    &mut actions,
                );
            }
        }

        for action in actions {
            self.apply_action(action);
        }

        self.ui.should_auto_scroll = false;
        if self.session.pending || self.typewriter.is_typing() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }
}

/* =========================
   UI Helpers
   ========================= */

fn status(message: impl Into<String>, success: bool) -> StatusLine {
    StatusLine {
        message: message.into(),
        success,
    }
}

pub fn draw_message(ui: &mut egui::Ui, colors: &UiSettings, msg: &Message, text: &str) {
    let (bg, right) = match msg {
        Message::Player(_) => (colors.color("Player"), true),
        Message::Narration(_) => (colors.color("Narration"), false),
        Message::System(_) => (colors.color("System"), false),
    };

    ui.add_space(6.0);

    if right {
        ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
            bubble(ui, bg, text);
        });
    } else {
        bubble(ui, bg, text);
    }
}

pub fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: &str) -> egui::Response {
    egui::Frame::new()
        .fill(color)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        })
        .response
}

pub fn hp_bar(ui: &mut egui::Ui, hp: i32, max_hp: i32, fraction: f32, fill: egui::Color32) {
    ui.add(
        egui::ProgressBar::new(fraction)
            .fill(fill)
            .text(format!("{hp} / {max_hp}")),
    );
}
