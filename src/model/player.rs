use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    #[default]
    Warrior,
    Mage,
    Rogue,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 3] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(name))
    }

    /// (max_hp, attack, defense, starting items)
    fn starting_kit(&self) -> (i32, i32, i32, &'static [&'static str]) {
        match self {
            CharacterClass::Warrior => (120, 12, 8, &["Longsword", "Battered shield"]),
            CharacterClass::Mage => (80, 15, 4, &["Oak staff", "Spellbook"]),
            CharacterClass::Rogue => (100, 13, 6, &["Twin daggers", "Lockpicks"]),
        }
    }
}

/// An inventory entry. The model sends either a bare string or a record,
/// both land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRepr")]
pub struct Item {
    pub name: String,
    pub description: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRepr {
    Name(String),
    Record {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default = "one")]
        quantity: u32,
    },
}

fn one() -> u32 {
    1
}

impl From<ItemRepr> for Item {
    fn from(repr: ItemRepr) -> Self {
        match repr {
            ItemRepr::Name(name) => Item::named(name),
            ItemRepr::Record {
                name,
                description,
                quantity,
            } => Item {
                name,
                description,
                quantity,
            },
        }
    }
}

impl Item {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            quantity: 1,
        }
    }

    pub fn label(&self) -> String {
        if self.quantity > 1 {
            format!("{} ×{}", self.name, self.quantity)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: CharacterClass,
    #[serde(alias = "health")]
    pub hp: i32,
    #[serde(default, alias = "max_hp", alias = "maxHealth")]
    pub max_hp: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub inventory: Vec<Item>,
}

impl Player {
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let (max_hp, attack, defense, items) = class.starting_kit();
        Self {
            name: name.into(),
            class,
            hp: max_hp,
            max_hp,
            attack,
            defense,
            inventory: items.iter().map(|i| Item::named(*i)).collect(),
        }
    }

    /// Health for display, clamped into `[0, max_hp]`.
    pub fn display_hp(&self) -> i32 {
        clamp_hp(self.hp, self.max_hp)
    }

    pub fn hp_fraction(&self) -> f32 {
        fraction(self.hp, self.max_hp)
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new("Unnamed Hero", CharacterClass::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub name: String,
    #[serde(default, alias = "health")]
    pub hp: i32,
    #[serde(default, alias = "max_hp", alias = "maxHealth")]
    pub max_hp: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub description: String,
}

impl Enemy {
    pub fn display_hp(&self) -> i32 {
        clamp_hp(self.hp, self.effective_max_hp())
    }

    pub fn hp_fraction(&self) -> f32 {
        fraction(self.hp, self.effective_max_hp())
    }

    // Older responses omit max hp; treat the current value as the ceiling.
    fn effective_max_hp(&self) -> i32 {
        self.max_hp.max(self.hp)
    }
}

fn clamp_hp(hp: i32, max_hp: i32) -> i32 {
    hp.clamp(0, max_hp.max(0))
}

fn fraction(hp: i32, max_hp: i32) -> f32 {
    if max_hp <= 0 {
        return 0.0;
    }
    clamp_hp(hp, max_hp) as f32 / max_hp as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_accepts_strings_and_records() {
        let items: Vec<Item> = serde_json::from_str(
            r#"["Torch", {"name": "Potion", "description": "Heals", "quantity": 3}, {"name": "Rope"}]"#,
        )
        .unwrap();

        assert_eq!(items[0], Item::named("Torch"));
        assert_eq!(items[1].quantity, 3);
        assert_eq!(items[1].description, "Heals");
        assert_eq!(items[2].quantity, 1);
        assert_eq!(items[1].label(), "Potion ×3");
    }

    #[test]
    fn display_hp_is_clamped_but_stored_hp_is_not() {
        let mut player = Player::new("Kaelen", CharacterClass::Mage);
        player.hp = -12;
        assert_eq!(player.display_hp(), 0);
        assert_eq!(player.hp, -12);
        assert_eq!(player.hp_fraction(), 0.0);

        player.hp = player.max_hp + 40;
        assert_eq!(player.display_hp(), player.max_hp);
        assert_eq!(player.hp_fraction(), 1.0);
    }

    #[test]
    fn enemy_without_max_hp_uses_current_hp() {
        let enemy: Enemy = serde_json::from_str(r#"{"name": "Ghoul", "health": 30}"#).unwrap();
        assert_eq!(enemy.hp, 30);
        assert_eq!(enemy.hp_fraction(), 1.0);
    }

    #[test]
    fn class_lookup_ignores_case() {
        assert_eq!(CharacterClass::from_name("rogue"), Some(CharacterClass::Rogue));
        assert_eq!(CharacterClass::from_name(" MAGE "), Some(CharacterClass::Mage));
        assert_eq!(CharacterClass::from_name("Bard"), None);
    }

    #[test]
    fn classes_start_with_full_health() {
        for class in CharacterClass::ALL {
            let p = Player::new("x", class);
            assert_eq!(p.hp, p.max_hp);
            assert!(!p.inventory.is_empty());
        }
    }
}
