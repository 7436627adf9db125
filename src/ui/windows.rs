use eframe::egui;

use crate::model::message::Message;
use crate::model::session::GameSession;
use crate::ui::app::UiAction;
use crate::ui::scene_image::IconTextures;

const ICON_SIZE: f32 = 48.0;

/// The whole story so far, oldest first.
pub fn draw_log_window(ctx: &egui::Context, open: &mut bool, session: &GameSession) {
    egui::Window::new("Adventure Log")
        .open(open)
        .default_size([420.0, 480.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if session.log.is_empty() {
                        ui.label("Nothing has happened yet.");
                    }
                    for msg in &session.log {
                        let text = match msg {
                            Message::Player(t) => egui::RichText::new(t).italics().strong(),
                            Message::Narration(t) => egui::RichText::new(t),
                            Message::System(t) => egui::RichText::new(t).weak(),
                        };
                        ui.add(egui::Label::new(text).wrap());
                        ui.add_space(4.0);
                    }
                });
        });
}

pub fn draw_inventory_window(
    ctx: &egui::Context,
    open: &mut bool,
    session: &GameSession,
    icons: &mut IconTextures,
    actions: &mut Vec<UiAction>,
) {
    egui::Window::new("Inventory")
        .open(open)
        .default_size([420.0, 360.0])
        .show(ctx, |ui| {
            let inventory = &session.player.inventory;
            if inventory.is_empty() {
                ui.label("Your pack is empty.");
                return;
            }

            egui::Grid::new("inventory_grid")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui| {
                    for item in inventory {
                        let size = egui::vec2(ICON_SIZE, ICON_SIZE);
                        match session.item_icons.get(&item.name) {
                            Some(icon) => {
                                let texture = icons.texture(ctx, &item.name, icon);
                                ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                            }
                            None => {
                                actions.push(UiAction::FetchIcon(item.clone()));
                                ui.add_sized(size, egui::Spinner::new());
                            }
                        }

                        let response = ui.label(egui::RichText::new(item.label()).strong());
                        if response.hovered() && !session.item_hints.contains_key(&item.name) {
                            actions.push(UiAction::Inspect(item.clone()));
                        }

                        let detail = session
                            .item_hints
                            .get(&item.name)
                            .map(String::as_str)
                            .or_else(|| session.item_hint_error(&item.name))
                            .unwrap_or(item.description.as_str());
                        if detail.is_empty() {
                            ui.weak("Hover to inspect.");
                        } else {
                            ui.add(egui::Label::new(detail).wrap());
                        }
                        ui.end_row();
                    }
                });
        });
}
