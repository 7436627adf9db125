use serde::{Deserialize, Serialize};

/// Coarse category of a scene, used to pick an ambient track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    Battle,
    Dungeon,
    Forest,
    Peaceful,
    Default,
}

// Checked in order; the first category with a hit wins.
const KEYWORDS: &[(SceneType, &[&str])] = &[
    (SceneType::Battle, &["battle", "fight", "monster", "combat"]),
    (SceneType::Dungeon, &["dungeon", "cavern", "crypt", "underground"]),
    (SceneType::Forest, &["forest", "woods", "jungle", "swamp"]),
    (SceneType::Peaceful, &["village", "tavern", "town", "peaceful"]),
];

impl SceneType {
    pub fn classify(text: &str) -> SceneType {
        let lower = text.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(scene, _)| *scene)
            .unwrap_or(SceneType::Default)
    }

    pub fn key(&self) -> &'static str {
        match self {
            SceneType::Battle => "battle",
            SceneType::Dungeon => "dungeon",
            SceneType::Forest => "forest",
            SceneType::Peaceful => "peaceful",
            SceneType::Default => "default",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_route_to_their_category() {
        for (scene, words) in KEYWORDS {
            for word in *words {
                assert_eq!(SceneType::classify(&format!("A grim {word} at dusk")), *scene);
            }
        }
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(SceneType::classify("DARK FOREST clearing"), SceneType::Forest);
        assert_eq!(SceneType::classify("Cozy Tavern"), SceneType::Peaceful);
    }

    #[test]
    fn unmatched_text_is_default() {
        assert_eq!(SceneType::classify("A windswept mountain pass"), SceneType::Default);
        assert_eq!(SceneType::classify(""), SceneType::Default);
    }

    #[test]
    fn battle_outranks_location() {
        assert_eq!(SceneType::classify("monster in the dungeon"), SceneType::Battle);
        assert_eq!(SceneType::classify("crypt beneath the village"), SceneType::Dungeon);
    }
}
