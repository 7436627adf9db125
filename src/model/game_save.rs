use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::message::Message;
use crate::model::player::{Enemy, Player};
use crate::model::scene_image::SceneImage;
use crate::model::screen::Screen;

const QUICKSAVE_FILE: &str = "quicksave.json";

/// Flat copy of what is on screen. Written and read verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSave {
    pub screen: Screen,
    pub player: Player,
    pub enemy: Option<Enemy>,
    pub log: Vec<Message>,
    pub suggested_actions: Vec<String>,
    pub image: Option<SceneImage>,
    pub image_prompt: String,
    #[serde(default)]
    pub item_hints: BTreeMap<String, String>,
    #[serde(default)]
    pub item_icons: BTreeMap<String, SceneImage>,
}

/// The one fixed quick-save slot.
pub fn quicksave_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(crate::APP_DIR);
    path.push(QUICKSAVE_FILE);
    path
}

pub fn save_to(path: &Path, save: &GameSave) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating save directory {}", parent.display()))?;
    }
    let json = serde_json::to_string(save).context("serializing save")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_from(path: &Path) -> Result<GameSave> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

pub fn quick_save(save: &GameSave) -> Result<PathBuf> {
    let path = quicksave_path();
    save_to(&path, save)?;
    tracing::info!(path = %path.display(), "quick-saved");
    Ok(path)
}

pub fn quick_load() -> Result<GameSave> {
    let path = quicksave_path();
    let save = load_from(&path)?;
    tracing::info!(path = %path.display(), "quick-loaded");
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::{CharacterClass, Item};

    fn sample() -> GameSave {
        let mut player = Player::new("Kaelen", CharacterClass::Rogue);
        player.hp = 37;
        player.inventory.push(Item {
            name: "Potion".into(),
            description: "Smells of mint".into(),
            quantity: 2,
        });

        GameSave {
            screen: Screen::InCombat,
            player,
            enemy: Some(Enemy {
                name: "Crypt Ghoul".into(),
                hp: 14,
                max_hp: 30,
                attack: 6,
                defense: 3,
                description: "Rotting claws".into(),
            }),
            log: vec![
                Message::Narration("The crypt door groans.".into()),
                Message::Player("Draw daggers".into()),
                Message::Narration("A ghoul lurches forward.".into()),
            ],
            suggested_actions: vec!["Strike".into(), "Flee".into()],
            image: Some(SceneImage::encoded("image/png", "AQID")),
            image_prompt: "crypt ghoul, torchlight".into(),
            item_hints: BTreeMap::from([("Potion".to_string(), "Drink it.".to_string())]),
            item_icons: BTreeMap::from([(
                "Potion".to_string(),
                SceneImage::Placeholder { seed: 11 },
            )]),
        }
    }

    #[test]
    fn save_then_load_reproduces_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(QUICKSAVE_FILE);

        let save = sample();
        save_to(&path, &save).unwrap();
        assert_eq!(load_from(&path).unwrap(), save);
    }

    #[test]
    fn saving_again_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(QUICKSAVE_FILE);

        save_to(&path, &sample()).unwrap();
        let mut second = sample();
        second.screen = Screen::Exploring;
        second.enemy = None;
        save_to(&path, &second).unwrap();

        assert_eq!(load_from(&path).unwrap(), second);
    }

    #[test]
    fn loading_a_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
