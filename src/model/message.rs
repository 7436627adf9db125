use serde::{Deserialize, Serialize};

/// One line of the story log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Message {
    /// An action the player submitted.
    Player(String),
    Narration(String),
    System(String),
}

impl Message {
    pub fn text(&self) -> &str {
        match self {
            Message::Player(t) | Message::Narration(t) | Message::System(t) => t,
        }
    }

    /// The form sent back to the model as history.
    pub fn as_history_line(&self) -> String {
        match self {
            Message::Player(t) => format!("> {t}"),
            Message::Narration(t) | Message::System(t) => t.clone(),
        }
    }
}
