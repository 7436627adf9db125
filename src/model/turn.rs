use serde::{Deserialize, Serialize};

use crate::model::player::{CharacterClass, Enemy, Item, Player};

/// How many story entries are sent back to the model as context.
pub const HISTORY_WINDOW: usize = 5;

/// What the client sends for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub action: String,
    pub history: Vec<String>,
    pub player: Player,
    pub enemy: Option<Enemy>,
}

impl TurnRequest {
    pub fn is_opening(&self) -> bool {
        self.history.is_empty()
    }
}

/// One model-generated step of the story. Replaces client state wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub narrative: String,
    pub player: Player,
    pub suggested_actions: Vec<String>,
    pub image_prompt: String,
    pub game_over: bool,
    pub encounter: Option<Enemy>,
}

/// Wire shape. Accepts the current field names as well as the older
/// `description` / `health` / `possibleActions` / `enemy` vocabulary.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTurn {
    #[serde(alias = "description")]
    narrative: String,
    #[serde(default)]
    player: Option<WirePlayer>,
    #[serde(default)]
    health: Option<i32>,
    #[serde(default)]
    inventory: Option<Vec<Item>>,
    #[serde(default, alias = "possibleActions", alias = "suggested_actions")]
    suggested_actions: Vec<String>,
    #[serde(default, alias = "image_prompt")]
    image_prompt: String,
    #[serde(default, alias = "game_over")]
    game_over: bool,
    #[serde(default, alias = "enemy")]
    encounter: Option<Enemy>,
}

/// The model's player record. Every field may be missing; gaps are filled
/// from the player the request was made with.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default, alias = "health")]
    hp: Option<i32>,
    #[serde(default, alias = "max_hp", alias = "maxHealth")]
    max_hp: Option<i32>,
    #[serde(default)]
    attack: Option<i32>,
    #[serde(default)]
    defense: Option<i32>,
    #[serde(default)]
    inventory: Option<Vec<Item>>,
}

impl WirePlayer {
    fn merge_onto(self, current: &Player) -> Player {
        Player {
            name: self
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| current.name.clone()),
            class: self
                .class
                .as_deref()
                .and_then(CharacterClass::from_name)
                .unwrap_or(current.class),
            hp: self.hp.unwrap_or(current.hp),
            max_hp: self.max_hp.unwrap_or(current.max_hp),
            attack: self.attack.unwrap_or(current.attack),
            defense: self.defense.unwrap_or(current.defense),
            inventory: self.inventory.unwrap_or_else(|| current.inventory.clone()),
        }
    }
}

impl WireTurn {
    fn into_response(self, current: &Player) -> TurnResponse {
        let mut player = match self.player {
            Some(player) => player.merge_onto(current),
            None => current.clone(),
        };
        // Legacy top-level fields.
        if let Some(hp) = self.health {
            player.hp = hp;
        }
        if let Some(inventory) = self.inventory {
            player.inventory = inventory;
        }

        TurnResponse {
            narrative: self.narrative,
            player,
            suggested_actions: self.suggested_actions,
            image_prompt: self.image_prompt,
            game_over: self.game_over,
            encounter: self.encounter,
        }
    }
}

/// Parse the raw model text into a turn. Nothing beyond JSON shape is checked.
pub fn decode_turn(raw: &str, current: &Player) -> Result<TurnResponse, serde_json::Error> {
    let wire: WireTurn = serde_json::from_str(strip_code_fence(raw))?;
    Ok(wire.into_response(current))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_player_record() {
        let current = Player::new("Kaelen", CharacterClass::Warrior);
        let raw = r#"{
            "narrative": "A cold wind.",
            "player": {"name": "Kaelen", "class": "Warrior", "hp": 90, "maxHp": 120,
                       "attack": 12, "defense": 8, "inventory": ["Longsword"]},
            "suggestedActions": ["Go north"],
            "imagePrompt": "windswept ridge",
            "gameOver": false,
            "encounter": null
        }"#;

        let turn = decode_turn(raw, &current).unwrap();
        assert_eq!(turn.player.hp, 90);
        assert_eq!(turn.player.inventory, vec![Item::named("Longsword")]);
        assert_eq!(turn.suggested_actions, vec!["Go north".to_string()]);
        assert!(turn.encounter.is_none());
    }

    #[test]
    fn decodes_legacy_field_names_onto_current_player() {
        let current = Player::new("Kaelen", CharacterClass::Rogue);
        let raw = "```json\n{\"description\": \"A goblin leaps out!\", \"health\": 70, \
                   \"inventory\": [\"Torch\"], \"possibleActions\": [\"Fight\", \"Flee\"], \
                   \"imagePrompt\": \"goblin ambush\", \"enemy\": {\"name\": \"Goblin\", \"health\": 20}}\n```";

        let turn = decode_turn(raw, &current).unwrap();
        assert_eq!(turn.narrative, "A goblin leaps out!");
        assert_eq!(turn.player.hp, 70);
        assert_eq!(turn.player.name, "Kaelen");
        assert_eq!(turn.player.attack, current.attack);
        assert_eq!(turn.player.inventory, vec![Item::named("Torch")]);
        assert_eq!(turn.encounter.unwrap().name, "Goblin");
        assert!(!turn.game_over);
    }

    #[test]
    fn partial_player_record_is_filled_from_current() {
        let current = Player::new("Kaelen", CharacterClass::Rogue);
        let raw = r#"{
            "narrative": "You slip into the shadows.",
            "player": {"class": "rogue", "hp": 64, "inventory": ["Lockpicks"]},
            "suggestedActions": ["Wait"]
        }"#;

        let turn = decode_turn(raw, &current).unwrap();
        assert_eq!(turn.player.class, CharacterClass::Rogue);
        assert_eq!(turn.player.name, "Kaelen");
        assert_eq!(turn.player.hp, 64);
        assert_eq!(turn.player.max_hp, current.max_hp);
        assert_eq!(turn.player.attack, current.attack);
        assert_eq!(turn.player.inventory, vec![Item::named("Lockpicks")]);
    }

    #[test]
    fn unknown_class_keeps_the_current_one() {
        let current = Player::new("Kaelen", CharacterClass::Mage);
        let raw = r#"{"narrative": "x", "player": {"name": "Kaelen", "class": "Archmage", "hp": 80, "maxHp": 80}}"#;

        let turn = decode_turn(raw, &current).unwrap();
        assert_eq!(turn.player.class, CharacterClass::Mage);
    }

    #[test]
    fn rejects_non_json() {
        let current = Player::default();
        assert!(decode_turn("The dungeon master shrugs.", &current).is_err());
    }
}
