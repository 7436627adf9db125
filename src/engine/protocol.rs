use crate::model::player::{Item, Player};
use crate::model::scene_image::SceneImage;
use crate::model::turn::{TurnRequest, TurnResponse};

/// Sent from the UI. `generation` ties an answer to the session that asked.
pub enum EngineCommand {
    Turn {
        generation: u64,
        request: TurnRequest,
    },
    InspectItem {
        generation: u64,
        item: Item,
        player: Player,
    },
    ItemIcon {
        generation: u64,
        item: Item,
    },
}

pub enum EngineResponse {
    TurnCompleted {
        generation: u64,
        /// Failure is already the user-facing sentence.
        result: Result<TurnResponse, String>,
    },
    ImageReady {
        generation: u64,
        image: SceneImage,
    },
    ItemHint {
        generation: u64,
        item: String,
        hint: Result<String, String>,
    },
    ItemIcon {
        generation: u64,
        item: String,
        icon: SceneImage,
    },
}
