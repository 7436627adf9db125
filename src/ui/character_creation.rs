use eframe::egui;

use crate::model::player::CharacterClass;
use crate::model::session::GameSession;
use crate::ui::app::{UiAction, UiState};

pub fn draw(
    ctx: &egui::Context,
    state: &mut UiState,
    session: &GameSession,
    actions: &mut Vec<UiAction>,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 5.0);
            ui.heading("Create your hero");
            ui.add_space(16.0);

            ui.label("What is your name?");
            let name_box = ui.add(
                egui::TextEdit::singleline(&mut state.char_name)
                    .hint_text("e.g., Kaelen the Brave")
                    .desired_width(260.0),
            );

            ui.add_space(12.0);
            ui.label("Choose your class:");
            ui.horizontal(|ui| {
                // Centre the row of class buttons.
                let row_width = 3.0 * 70.0;
                ui.add_space(((ui.available_width() - row_width) / 2.0).max(0.0));
                for class in CharacterClass::ALL {
                    ui.selectable_value(&mut state.char_class, class, class.label());
                }
            });

            if let Some(error) = &session.error {
                ui.add_space(8.0);
                ui.colored_label(egui::Color32::LIGHT_RED, error);
            }

            ui.add_space(16.0);
            let ready = !state.char_name.trim().is_empty() && !session.pending;
            let submitted = name_box.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(ready, egui::Button::new("Begin Your Adventure"))
                .clicked();

            if ready && (clicked || submitted) {
                actions.push(UiAction::Begin {
                    name: state.char_name.trim().to_string(),
                    class: state.char_class,
                });
            }
        });
    });
}
