use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use crate::audio::scene::SceneType;
use crate::model::game_save::GameSave;
use crate::model::message::Message;
use crate::model::player::{CharacterClass, Enemy, Player};
use crate::model::scene_image::SceneImage;
use crate::model::screen::{Screen, ScreenEvent, TurnOutcome};
use crate::model::turn::{TurnRequest, TurnResponse, HISTORY_WINDOW};

pub const NEW_GAME_ACTION: &str = "Start a New Game";
pub const OPENING_ACTION: &str = "Begin the adventure.";
pub const FALLEN_MESSAGE: &str =
    "You have fallen. The adventure ends here. But a new one can always begin...";
const GENERIC_ERROR: &str = "Something went wrong. Please try another action.";

/// A failed item hint is asked for again after this long.
pub const HINT_RETRY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
enum HintRequest {
    InFlight,
    Failed { message: String, at: Instant },
}

/// Everything the views display. Replaced piecewise by model responses,
/// never validated.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    pub screen: Screen,
    pub player: Player,
    pub enemy: Option<Enemy>,
    pub log: Vec<Message>,
    pub suggested_actions: Vec<String>,
    pub image: Option<SceneImage>,
    pub image_prompt: String,
    pub item_hints: BTreeMap<String, String>,
    pub item_icons: BTreeMap<String, SceneImage>,

    /// Hint and icon requests not yet answered, keyed by item name.
    /// Never saved.
    hint_requests: BTreeMap<String, HintRequest>,
    icon_requests: BTreeSet<String>,

    /// A turn request is outstanding; input controls are disabled.
    pub pending: bool,
    pub error: Option<String>,

    /// Bumped on restart/load so answers to abandoned requests are dropped.
    generation: u64,
}

impl GameSession {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Character form submitted. Returns the opening request.
    pub fn begin(&mut self, name: &str, class: CharacterClass) -> Option<TurnRequest> {
        let name = name.trim();
        if self.screen != Screen::CharacterCreation || name.is_empty() || self.pending {
            return None;
        }

        let generation = self.generation;
        *self = GameSession {
            generation,
            player: Player::new(name, class),
            ..GameSession::default()
        };
        self.screen = self.screen.next(ScreenEvent::CharacterSubmitted);
        self.pending = true;

        Some(self.request(OPENING_ACTION))
    }

    /// Free-form or suggested action. `None` when nothing should be sent.
    pub fn submit_action(&mut self, text: &str) -> Option<TurnRequest> {
        let action = text.trim();
        if self.pending || action.is_empty() {
            return None;
        }

        if self.screen == Screen::GameOver && action == NEW_GAME_ACTION {
            self.restart();
            return None;
        }

        if !self.screen.accepts_actions() {
            return None;
        }

        let request = self.request(action);
        self.log.push(Message::Player(action.to_string()));
        self.screen = self.screen.next(ScreenEvent::ActionSubmitted);
        self.pending = true;
        self.error = None;

        Some(request)
    }

    pub fn apply_turn(&mut self, response: TurnResponse) -> TurnOutcome {
        self.pending = false;
        self.error = None;

        let outcome = TurnOutcome::classify(&response, self.screen == Screen::InCombat);

        self.player = response.player;
        self.enemy = response.encounter;
        self.log.push(Message::Narration(response.narrative));
        self.suggested_actions = response.suggested_actions;
        self.image_prompt = response.image_prompt;
        self.screen = self.screen.next(ScreenEvent::TurnResolved(outcome));

        if outcome == TurnOutcome::Defeat {
            self.log.push(Message::System(FALLEN_MESSAGE.to_string()));
            self.suggested_actions = vec![NEW_GAME_ACTION.to_string()];
        }

        outcome
    }

    /// A failed turn keeps whatever was on screen and shows `message`.
    pub fn apply_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.pending = false;
        self.error = Some(if message.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            message
        });
        self.screen = self.screen.next(ScreenEvent::TurnFailed);
    }

    pub fn apply_image(&mut self, image: SceneImage) {
        self.image = Some(image);
    }

    /// Whether a hint for `item` should be requested now. Marks it in flight
    /// when it should.
    pub fn request_item_hint(&mut self, item: &str, now: Instant) -> bool {
        if self.item_hints.contains_key(item) {
            return false;
        }
        match self.hint_requests.get(item) {
            Some(HintRequest::InFlight) => return false,
            Some(HintRequest::Failed { at, .. }) if now.duration_since(*at) < HINT_RETRY => {
                return false
            }
            _ => {}
        }
        self.hint_requests.insert(item.to_string(), HintRequest::InFlight);
        true
    }

    /// Successful hints are kept for good; failures only until the next retry.
    pub fn apply_item_hint(&mut self, item: String, hint: Result<String, String>, now: Instant) {
        match hint {
            Ok(hint) => {
                self.hint_requests.remove(&item);
                self.item_hints.insert(item, hint);
            }
            Err(message) => {
                self.hint_requests
                    .insert(item, HintRequest::Failed { message, at: now });
            }
        }
    }

    pub fn item_hint_error(&self, item: &str) -> Option<&str> {
        match self.hint_requests.get(item) {
            Some(HintRequest::Failed { message, .. }) => Some(message),
            _ => None,
        }
    }

    /// Whether an icon for `item` should be requested. Marks it in flight.
    pub fn request_item_icon(&mut self, item: &str) -> bool {
        if self.item_icons.contains_key(item) {
            return false;
        }
        self.icon_requests.insert(item.to_string())
    }

    pub fn apply_item_icon(&mut self, item: String, icon: SceneImage) {
        self.icon_requests.remove(&item);
        self.item_icons.insert(item, icon);
    }

    pub fn restart(&mut self) {
        let generation = self.generation + 1;
        *self = GameSession {
            generation,
            ..GameSession::default()
        };
    }

    pub fn scene_type(&self) -> SceneType {
        SceneType::classify(&self.image_prompt)
    }

    /// Log index and text of the newest narration, wherever it sits.
    pub fn latest_narration(&self) -> Option<(usize, &str)> {
        self.log
            .iter()
            .rposition(|msg| matches!(msg, Message::Narration(_)))
            .map(|index| (index, self.log[index].text()))
    }

    pub fn snapshot(&self) -> GameSave {
        GameSave {
            screen: self.screen,
            player: self.player.clone(),
            enemy: self.enemy.clone(),
            log: self.log.clone(),
            suggested_actions: self.suggested_actions.clone(),
            image: self.image.clone(),
            image_prompt: self.image_prompt.clone(),
            item_hints: self.item_hints.clone(),
            item_icons: self.item_icons.clone(),
        }
    }

    /// Replace everything with `save`. A request still in flight is abandoned.
    pub fn restore(&mut self, save: GameSave) {
        let generation = self.generation + 1;
        *self = GameSession {
            // A save taken mid-request comes back with its inputs enabled.
            screen: match save.screen {
                Screen::Loading => Screen::CharacterCreation,
                screen => screen,
            },
            player: save.player,
            enemy: save.enemy,
            log: save.log,
            suggested_actions: save.suggested_actions,
            image: save.image,
            image_prompt: save.image_prompt,
            item_hints: save.item_hints,
            item_icons: save.item_icons,
            generation,
            ..GameSession::default()
        };
    }

    fn request(&self, action: &str) -> TurnRequest {
        let start = self.log.len().saturating_sub(HISTORY_WINDOW);
        TurnRequest {
            action: action.to_string(),
            history: self.log[start..].iter().map(Message::as_history_line).collect(),
            player: self.player.clone(),
            enemy: self.enemy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(narrative: &str, hp: i32, enemy: Option<&str>) -> TurnResponse {
        let mut player = Player::new("Kaelen", CharacterClass::Warrior);
        player.hp = hp;
        TurnResponse {
            narrative: narrative.into(),
            player,
            suggested_actions: vec!["Look around".into(), "Go north".into()],
            image_prompt: "dark forest path".into(),
            game_over: false,
            encounter: enemy.map(|name| Enemy {
                name: name.into(),
                hp: 20,
                max_hp: 20,
                attack: 5,
                defense: 2,
                description: "snarling".into(),
            }),
        }
    }

    fn started() -> GameSession {
        let mut session = GameSession::default();
        session.begin("Kaelen", CharacterClass::Warrior).unwrap();
        session.apply_turn(turn("You wake in a forest.", 120, None));
        session
    }

    #[test]
    fn begin_requires_a_name() {
        let mut session = GameSession::default();
        assert!(session.begin("   ", CharacterClass::Mage).is_none());
        assert_eq!(session.screen, Screen::CharacterCreation);

        let request = session.begin(" Kaelen ", CharacterClass::Mage).unwrap();
        assert_eq!(session.screen, Screen::Loading);
        assert!(session.pending);
        assert!(request.is_opening());
        assert_eq!(request.player.name, "Kaelen");
    }

    #[test]
    fn actions_are_refused_while_pending() {
        let mut session = started();
        assert!(session.submit_action("Go north").is_some());
        assert!(session.pending);
        assert!(session.submit_action("Go south").is_none());
        assert_eq!(session.log.len(), 2);
    }

    #[test]
    fn request_carries_recent_history_only() {
        let mut session = started();
        for i in 0..6 {
            session.submit_action(&format!("step {i}")).unwrap();
            session.apply_turn(turn(&format!("result {i}"), 100, None));
        }

        let request = session.submit_action("rest").unwrap();
        assert_eq!(request.history.len(), HISTORY_WINDOW);
        assert_eq!(request.history.last().unwrap(), "result 5");
        assert_eq!(request.action, "rest");
    }

    #[test]
    fn encounter_enters_combat_and_victory_leaves_it() {
        let mut session = started();
        session.submit_action("Follow the growl").unwrap();
        assert_eq!(session.apply_turn(turn("A wolf!", 110, Some("Wolf"))), TurnOutcome::Encounter);
        assert_eq!(session.screen, Screen::InCombat);
        assert_eq!(session.enemy.as_ref().unwrap().name, "Wolf");

        session.submit_action("Attack").unwrap();
        assert_eq!(session.apply_turn(turn("The wolf falls.", 100, None)), TurnOutcome::CombatEnded);
        assert_eq!(session.screen, Screen::Exploring);
        assert!(session.enemy.is_none());
    }

    #[test]
    fn defeat_offers_a_new_game() {
        let mut session = started();
        session.submit_action("Jump into the chasm").unwrap();
        session.apply_turn(turn("You fall.", 0, None));

        assert_eq!(session.screen, Screen::GameOver);
        assert_eq!(session.suggested_actions, vec![NEW_GAME_ACTION.to_string()]);
        assert_eq!(session.log.last().unwrap().text(), FALLEN_MESSAGE);

        assert!(session.submit_action("Look around").is_none());
        assert_eq!(session.screen, Screen::GameOver);

        let generation = session.generation();
        assert!(session.submit_action(NEW_GAME_ACTION).is_none());
        assert_eq!(session.screen, Screen::CharacterCreation);
        assert!(session.log.is_empty());
        assert!(!session.is_current(generation));
    }

    #[test]
    fn failure_keeps_prior_narrative_and_actions() {
        let mut session = started();
        let log_before = session.log.clone();
        let actions_before = session.suggested_actions.clone();

        session.submit_action("Go north").unwrap();
        session.apply_failure("The Dungeon Master is bewildered.");

        assert!(!session.pending);
        assert_eq!(session.screen, Screen::Exploring);
        assert_eq!(session.suggested_actions, actions_before);
        assert!(session.log.starts_with(&log_before));
        assert!(!session.error.as_deref().unwrap().is_empty());
    }

    #[test]
    fn blank_failure_message_still_shows_an_error() {
        let mut session = started();
        session.submit_action("Go north").unwrap();
        session.apply_failure("  ");
        assert_eq!(session.error.as_deref(), Some(GENERIC_ERROR));
    }

    #[test]
    fn failed_opening_returns_to_character_creation() {
        let mut session = GameSession::default();
        session.begin("Kaelen", CharacterClass::Rogue).unwrap();
        session.apply_failure("offline");
        assert_eq!(session.screen, Screen::CharacterCreation);
        assert!(!session.pending);
        assert!(session.begin("Kaelen", CharacterClass::Rogue).is_some());
    }

    #[test]
    fn snapshot_restores_displayed_fields() {
        let mut session = started();
        session.apply_image(SceneImage::Placeholder { seed: 42 });
        session.apply_item_hint("Longsword".into(), Ok("Sharp.".into()), Instant::now());
        session.apply_item_icon("Longsword".into(), SceneImage::Placeholder { seed: 3 });

        let save = session.snapshot();
        let mut restored = GameSession::default();
        restored.restore(save.clone());

        assert_eq!(restored.snapshot(), save);
        assert_eq!(restored.screen, Screen::Exploring);
    }

    #[test]
    fn hints_are_requested_once_and_kept() {
        let mut session = started();
        let now = Instant::now();

        assert!(session.request_item_hint("Longsword", now));
        assert!(!session.request_item_hint("Longsword", now));

        session.apply_item_hint("Longsword".into(), Ok("Sharp.".into()), now);
        assert_eq!(session.item_hints["Longsword"], "Sharp.");
        assert!(!session.request_item_hint("Longsword", now + HINT_RETRY * 2));
    }

    #[test]
    fn failed_hint_is_retried_later_and_not_saved() {
        let mut session = started();
        let now = Instant::now();

        assert!(session.request_item_hint("Longsword", now));
        session.apply_item_hint("Longsword".into(), Err("offline".into()), now);

        assert!(!session.item_hints.contains_key("Longsword"));
        assert_eq!(session.item_hint_error("Longsword"), Some("offline"));
        assert!(session.snapshot().item_hints.is_empty());

        assert!(!session.request_item_hint("Longsword", now + Duration::from_secs(1)));
        assert!(session.request_item_hint("Longsword", now + HINT_RETRY));
        assert_eq!(session.item_hint_error("Longsword"), None);
    }

    #[test]
    fn restart_forgets_outstanding_item_requests() {
        let mut session = started();
        let now = Instant::now();
        assert!(session.request_item_hint("Longsword", now));
        assert!(session.request_item_icon("Longsword"));

        session.restart();
        session.begin("Brenna", CharacterClass::Warrior).unwrap();
        assert!(session.request_item_hint("Longsword", now));
        assert!(session.request_item_icon("Longsword"));
    }

    #[test]
    fn icons_are_requested_once_and_cached() {
        let mut session = started();
        assert!(session.request_item_icon("Longsword"));
        assert!(!session.request_item_icon("Longsword"));

        session.apply_item_icon("Longsword".into(), SceneImage::Placeholder { seed: 1 });
        assert!(!session.request_item_icon("Longsword"));
        assert_eq!(
            session.item_icons.get("Longsword"),
            Some(&SceneImage::Placeholder { seed: 1 })
        );
    }
}
