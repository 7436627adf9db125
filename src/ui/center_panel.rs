use eframe::egui;

use crate::model::screen::Screen;
use crate::model::session::GameSession;
use crate::ui::app::{draw_message, UiAction, UiState};
use crate::ui::scene_image::SceneTexture;
use crate::ui::settings::UiSettings;
use crate::ui::typewriter::Typewriter;

const IMAGE_MAX_HEIGHT: f32 = 320.0;

pub fn draw_center_panel(
    ctx: &egui::Context,
    state: &mut UiState,
    session: &GameSession,
    scene: &mut SceneTexture,
    typewriter: &mut Typewriter,
    colors: &UiSettings,
    actions: &mut Vec<UiAction>,
) {
    let input_id = egui::Id::new("action_input_box");

    // ---------- Input bar ----------
    egui::TopBottomPanel::bottom("action_input").show(ctx, |ui| {
        if let Some(error) = &session.error {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
        }

        // Suggestions wait until the narration has finished typing.
        if !typewriter.is_typing() {
            ui.horizontal_wrapped(|ui| {
                for action in &session.suggested_actions {
                    if ui
                        .add_enabled(!session.pending, egui::Button::new(action))
                        .clicked()
                    {
                        actions.push(UiAction::Act(action.clone()));
                    }
                }
            });
        }

        let accepts_text = session.screen.accepts_actions() && !session.pending;
        let mut send_now = false;

        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                accepts_text,
                egui::TextEdit::singleline(&mut state.input_text)
                    .id(input_id)
                    .hint_text(hint_for(session))
                    .desired_width(ui.available_width() - 70.0),
            );

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }

            if ui.add_enabled(accepts_text, egui::Button::new("Act")).clicked() {
                send_now = true;
            }
        });

        if send_now && !state.input_text.trim().is_empty() {
            actions.push(UiAction::Act(state.input_text.trim().to_string()));
            // Keep cursor focused
            ui.memory_mut(|m| m.request_focus(input_id));
        }
    });

    // ---------- Scene + story ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(texture) = scene.texture(ctx, session.image.as_ref()) {
            ui.vertical_centered(|ui| {
                ui.add(
                    egui::Image::new(texture)
                        .max_width(ui.available_width())
                        .max_height(IMAGE_MAX_HEIGHT),
                );
            });
        } else if session.pending {
            ui.vertical_centered(|ui| {
                ui.spinner();
            });
        }

        ui.separator();

        let now = ui.input(|i| i.time);
        typewriter.follow(
            session.latest_narration(),
            now,
            colors.typewriter_ms as f64 / 1000.0,
        );

        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (i, msg) in session.log.iter().enumerate() {
                    if typewriter.is_tracking(i) && typewriter.is_typing() {
                        draw_message(ui, colors, msg, typewriter.visible(msg.text()));
                    } else {
                        draw_message(ui, colors, msg, msg.text());
                    }
                }

                if session.pending {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("The Dungeon Master ponders...");
                    });
                }
                if state.should_auto_scroll {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });

        // Click the story to finish the line at once.
        if typewriter.is_typing()
            && ui.rect_contains_pointer(ui.max_rect())
            && ui.input(|i| i.pointer.primary_clicked())
        {
            typewriter.skip();
        }
    });
}

fn hint_for(session: &GameSession) -> &'static str {
    match session.screen {
        Screen::InCombat => "Strike, defend, flee…",
        Screen::GameOver => "Your tale has ended.",
        _ => "What do you do?",
    }
}
