use crate::model::player::{Enemy, Item, Player};
use crate::model::turn::TurnRequest;

const ART_STYLE: &str = "Masterpiece, award-winning fantasy art, cinematic lighting";
const ICON_STYLE: &str =
    "Fantasy RPG inventory icon, a single object centered on a plain dark background, painterly";

/// Builds the text sent to the model. Only formats; no parsing, no networking.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn turn_instruction(request: &TurnRequest) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "You are the Dungeon Master for a text-based roguelike action fantasy adventure game. \
             Create a dynamic, challenging and immersive world with a dark, atmospheric tone.\n\n",
        );

        push_player(&mut prompt, &request.player);
        push_enemy(&mut prompt, request.enemy.as_ref());
        push_history(&mut prompt, &request.history);

        prompt.push_str("RULES:\n");
        prompt.push_str("- Based on the player's last action, generate the next step of the adventure.\n");
        prompt.push_str("- If the player fights, resolve the exchange and update health for both sides.\n");
        prompt.push_str("- If an enemy appears or is still fighting, include it as \"encounter\"; once it is defeated or escaped, set \"encounter\" to null.\n");
        prompt.push_str("- The game ends when the player's hp reaches 0; set \"gameOver\" to true.\n\n");

        prompt.push_str("Respond ONLY with a JSON object with these fields:\n");
        prompt.push_str("  narrative: string, 2-4 vivid sentences\n");
        prompt.push_str("  player: {name, class, hp, maxHp, attack, defense, inventory: [{name, description, quantity}]}\n");
        prompt.push_str("  suggestedActions: 3-5 short strings\n");
        prompt.push_str("  imagePrompt: at most 15 words for an image generator\n");
        prompt.push_str("  gameOver: boolean\n");
        prompt.push_str("  encounter: {name, hp, maxHp, attack, defense, description} or null\n");
        prompt.push_str("No markdown, no extra text.\n");

        prompt
    }

    pub fn item_hint(item: &Item, player: &Player) -> String {
        let mut prompt = String::new();
        prompt.push_str("You are the Dungeon Master of a dark fantasy adventure. ");
        prompt.push_str(&format!(
            "In one or two sentences, give {} the {} a cryptic but useful hint about this item.\n\n",
            player.name,
            player.class.label()
        ));
        prompt.push_str(&format!("ITEM: {}\n", item.name));
        if !item.description.is_empty() {
            prompt.push_str(&format!("DESCRIPTION: {}\n", item.description));
        }
        prompt.push_str("Reply with plain text only.\n");
        prompt
    }

    pub fn scene_image(prompt: &str) -> String {
        format!("{ART_STYLE}, {}", prompt.trim())
    }

    pub fn item_icon(item: &Item) -> String {
        if item.description.trim().is_empty() {
            format!("{ICON_STYLE}: {}", item.name.trim())
        } else {
            format!("{ICON_STYLE}: {}, {}", item.name.trim(), item.description.trim())
        }
    }
}

fn push_player(prompt: &mut String, player: &Player) {
    prompt.push_str("PLAYER:\n");
    prompt.push_str(&format!(
        "- {} the {}, hp {}/{}, attack {}, defense {}\n",
        player.name,
        player.class.label(),
        player.hp,
        player.max_hp,
        player.attack,
        player.defense
    ));

    let items: Vec<String> = player.inventory.iter().map(Item::label).collect();
    if items.is_empty() {
        prompt.push_str("- Inventory: empty\n\n");
    } else {
        prompt.push_str(&format!("- Inventory: {}\n\n", items.join(", ")));
    }
}

fn push_enemy(prompt: &mut String, enemy: Option<&Enemy>) {
    let Some(enemy) = enemy else {
        return;
    };
    prompt.push_str("CURRENT ENEMY:\n");
    prompt.push_str(&format!(
        "- {}, hp {}/{}, attack {}, defense {}\n",
        enemy.name, enemy.hp, enemy.max_hp, enemy.attack, enemy.defense
    ));
    if !enemy.description.is_empty() {
        prompt.push_str(&format!("- {}\n", enemy.description));
    }
    prompt.push('\n');
}

fn push_history(prompt: &mut String, history: &[String]) {
    if history.is_empty() {
        prompt.push_str("This is the very start of the adventure. Introduce the setting.\n\n");
        return;
    }
    prompt.push_str("RECENT HISTORY:\n");
    for line in history {
        prompt.push_str(line.trim());
        prompt.push('\n');
    }
    prompt.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::CharacterClass;

    #[test]
    fn instruction_mentions_stats_enemy_and_history() {
        let mut player = Player::new("Kaelen", CharacterClass::Rogue);
        player.hp = 42;
        let request = TurnRequest {
            action: "Stab".into(),
            history: vec!["> Enter the crypt".into(), "A ghoul waits.".into()],
            player,
            enemy: Some(Enemy {
                name: "Ghoul".into(),
                hp: 9,
                max_hp: 30,
                attack: 4,
                defense: 2,
                description: String::new(),
            }),
        };

        let prompt = PromptBuilder::turn_instruction(&request);
        assert!(prompt.contains("Kaelen the Rogue, hp 42/100"));
        assert!(prompt.contains("Twin daggers, Lockpicks"));
        assert!(prompt.contains("Ghoul, hp 9/30"));
        assert!(prompt.contains("> Enter the crypt\nA ghoul waits."));
    }

    #[test]
    fn opening_instruction_asks_for_an_introduction() {
        let request = TurnRequest {
            action: "Begin".into(),
            history: Vec::new(),
            player: Player::default(),
            enemy: None,
        };
        let prompt = PromptBuilder::turn_instruction(&request);
        assert!(prompt.contains("very start"));
        assert!(!prompt.contains("CURRENT ENEMY"));
    }

    #[test]
    fn scene_image_prefixes_style() {
        assert_eq!(
            PromptBuilder::scene_image(" ruined tower "),
            format!("{ART_STYLE}, ruined tower")
        );
    }

    #[test]
    fn item_icon_names_the_item() {
        assert_eq!(
            PromptBuilder::item_icon(&Item::named("Oak staff")),
            format!("{ICON_STYLE}: Oak staff")
        );

        let potion = Item {
            name: "Potion".into(),
            description: "Glows faintly red".into(),
            quantity: 2,
        };
        assert!(PromptBuilder::item_icon(&potion).ends_with("Potion, Glows faintly red"));
    }
}
