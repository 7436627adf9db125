use eframe::egui;

use crate::model::player::{Enemy, Player};
use crate::model::session::GameSession;
use crate::ui::app::{hp_bar, UiAction};

const PLAYER_HP: egui::Color32 = egui::Color32::from_rgb(60, 150, 70);
const ENEMY_HP: egui::Color32 = egui::Color32::from_rgb(170, 50, 50);

pub fn draw_right_panel(ctx: &egui::Context, session: &GameSession, actions: &mut Vec<UiAction>) {
    egui::SidePanel::right("right")
        .resizable(true)
        .default_width(300.0)
        .min_width(240.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                draw_player(ui, &session.player);

                if let Some(enemy) = &session.enemy {
                    ui.add_space(10.0);
                    draw_enemy(ui, enemy);
                }

                ui.add_space(10.0);
                draw_inventory(ui, session, actions);
            });
        });
}

/* =========================
   Player
   ========================= */

fn draw_player(ui: &mut egui::Ui, p: &Player) {
    ui.heading(&p.name);
    ui.label(p.class.label());

    ui.separator();
    ui.label("Health");
    hp_bar(ui, p.display_hp(), p.max_hp, p.hp_fraction(), PLAYER_HP);

    egui::Grid::new("player_stats").num_columns(2).show(ui, |ui| {
        ui.label("Attack");
        ui.label(p.attack.to_string());
        ui.end_row();
        ui.label("Defense");
        ui.label(p.defense.to_string());
        ui.end_row();
    });
}

/* =========================
   Enemy
   ========================= */

fn draw_enemy(ui: &mut egui::Ui, e: &Enemy) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(format!("⚔ {}", e.name)).strong().color(ENEMY_HP));
        if !e.description.is_empty() {
            ui.add(egui::Label::new(egui::RichText::new(&e.description).italics()).wrap());
        }

        hp_bar(ui, e.display_hp(), e.max_hp.max(e.hp), e.hp_fraction(), ENEMY_HP);

        ui.horizontal(|ui| {
            ui.label(format!("ATK {}", e.attack));
            ui.separator();
            ui.label(format!("DEF {}", e.defense));
        });
    });
}

/* =========================
   Inventory
   ========================= */

fn draw_inventory(ui: &mut egui::Ui, session: &GameSession, actions: &mut Vec<UiAction>) {
    ui.collapsing("Inventory", |ui| {
        if session.player.inventory.is_empty() {
            ui.label("Empty");
            return;
        }

        for item in &session.player.inventory {
            let response = ui.label(format!("• {}", item.label()));
            if !response.hovered() {
                continue;
            }

            match session.item_hints.get(&item.name) {
                Some(hint) => {
                    response.on_hover_text(hint);
                }
                None => {
                    actions.push(UiAction::Inspect(item.clone()));
                    let text = match session.item_hint_error(&item.name) {
                        Some(error) => error.to_string(),
                        None if item.description.is_empty() => {
                            "Consulting the Dungeon Master...".to_string()
                        }
                        None => item.description.clone(),
                    };
                    response.on_hover_text(text);
                }
            }
        }
    });
}
