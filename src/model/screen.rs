use serde::{Deserialize, Serialize};

use crate::model::turn::TurnResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    CharacterCreation,
    Loading,
    Exploring,
    InCombat,
    GameOver,
}

/// How a resolved turn moves the story along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Encounter,
    CombatEnded,
    Defeat,
}

impl TurnOutcome {
    pub fn classify(response: &TurnResponse, in_combat: bool) -> Self {
        if response.game_over || response.player.is_down() {
            TurnOutcome::Defeat
        } else if response.encounter.is_some() {
            TurnOutcome::Encounter
        } else if in_combat {
            TurnOutcome::CombatEnded
        } else {
            TurnOutcome::Continue
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    CharacterSubmitted,
    ActionSubmitted,
    TurnResolved(TurnOutcome),
    TurnFailed,
    Restart,
}

impl Screen {
    /// Next screen for `event`. Events that make no sense here leave the
    /// screen unchanged.
    pub fn next(self, event: ScreenEvent) -> Screen {
        use Screen::*;
        use ScreenEvent::*;
        use TurnOutcome::*;

        match (self, event) {
            (_, Restart) => CharacterCreation,

            (CharacterCreation, CharacterSubmitted) => Loading,

            (Loading, TurnResolved(Continue | CombatEnded)) => Exploring,
            (Loading, TurnResolved(Encounter)) => InCombat,
            (Loading, TurnResolved(Defeat)) => GameOver,
            (Loading, TurnFailed) => CharacterCreation,

            (Exploring, ActionSubmitted | TurnFailed) => Exploring,
            (Exploring, TurnResolved(Continue | CombatEnded)) => Exploring,
            (Exploring, TurnResolved(Encounter)) => InCombat,
            (Exploring, TurnResolved(Defeat)) => GameOver,

            (InCombat, ActionSubmitted | TurnFailed) => InCombat,
            (InCombat, TurnResolved(Encounter | Continue)) => InCombat,
            (InCombat, TurnResolved(CombatEnded)) => Exploring,
            (InCombat, TurnResolved(Defeat)) => GameOver,

            (screen, _) => screen,
        }
    }

    pub fn accepts_actions(&self) -> bool {
        matches!(self, Screen::Exploring | Screen::InCombat)
    }
}
