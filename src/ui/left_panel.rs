use eframe::egui;

use crate::ui::app::{LeftTab, UiAction, UiState};
use crate::ui::settings::AppSettings;

const SPEAKERS: [&str; 3] = ["Player", "Narration", "System"];

pub fn draw_left_panel(
    ctx: &egui::Context,
    ui_state: &mut UiState,
    settings: &mut AppSettings,
    actions: &mut Vec<UiAction>,
) {
    egui::SidePanel::left("left")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut ui_state.left_tab, LeftTab::Game, "Game");
                ui.selectable_value(&mut ui_state.left_tab, LeftTab::Settings, "Settings");
            });

            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match ui_state.left_tab {
                LeftTab::Game => draw_game_tab(ui, actions),
                LeftTab::Settings => draw_settings_tab(ui, settings, actions),
            });
        });
}

/* =========================
   Game
   ========================= */

fn draw_game_tab(ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
    ui.heading("Adventure");

    if ui.button("💾 Quick-save").clicked() {
        actions.push(UiAction::QuickSave);
    }
    if ui.button("📂 Quick-load").clicked() {
        actions.push(UiAction::QuickLoad);
    }

    ui.separator();

    if ui.button("⟲ Restart").on_hover_text("Abandon this hero").clicked() {
        actions.push(UiAction::Restart);
    }

    ui.separator();
    ui.small("F5  quick-save");
    ui.small("F9  quick-load");
}

/* =========================
   Settings
   ========================= */

fn draw_settings_tab(ui: &mut egui::Ui, settings: &mut AppSettings, actions: &mut Vec<UiAction>) {
    ui.label("UI Scale");
    ui.add(egui::Slider::new(&mut settings.ui.ui_scale, 0.75..=2.0));

    ui.label("Text speed (ms per letter)");
    ui.add(egui::Slider::new(&mut settings.ui.typewriter_ms, 0..=100));

    ui.separator();
    ui.label("Ambience volume");
    let mut volume = settings.audio.volume;
    if ui.add(egui::Slider::new(&mut volume, 0.0..=1.0)).changed() {
        actions.push(UiAction::SetVolume(volume));
    }
    if ui.button("Mute / unmute").clicked() {
        actions.push(UiAction::ToggleMute);
    }

    ui.separator();
    ui.collapsing("Colors", |ui| {
        for key in SPEAKERS {
            let mut color = settings.ui.color(key);
            ui.horizontal(|ui| {
                if ui.color_edit_button_srgba(&mut color).changed() {
                    settings.ui.set_color(key, color);
                }
                ui.label(key);
            });
        }
    });

    ui.collapsing("Model", |ui| {
        ui.label("Changes apply on next launch.");
        ui.label("API base URL");
        ui.text_edit_singleline(&mut settings.llm.base_url);
        ui.label("Text model");
        ui.text_edit_singleline(&mut settings.llm.text_model);
        ui.label("Image model");
        ui.text_edit_singleline(&mut settings.llm.image_model);
        ui.checkbox(&mut settings.llm.images_enabled, "Generate scene images");
    });

    ui.separator();
    if ui.button("Save settings").clicked() {
        actions.push(UiAction::SaveSettings);
    }
}
