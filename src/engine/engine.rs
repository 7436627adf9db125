use std::sync::mpsc::{Receiver, Sender};

use crate::engine::llm_client::{ImageKind, StoryModel};
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::player::{Item, Player};
use crate::model::scene_image::SceneImage;
use crate::model::turn::TurnRequest;

/// Serves model requests one at a time on its own thread.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    model: Box<dyn StoryModel>,
    images_enabled: bool,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        model: Box<dyn StoryModel>,
        images_enabled: bool,
    ) -> Self {
        Self {
            rx,
            tx,
            model,
            images_enabled,
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            let delivered = match cmd {
                EngineCommand::Turn {
                    generation,
                    request,
                } => self.turn(generation, &request),
                EngineCommand::InspectItem {
                    generation,
                    item,
                    player,
                } => self.item_hint(generation, item, &player),
                EngineCommand::ItemIcon { generation, item } => self.item_icon(generation, item),
            };

            if !delivered {
                break;
            }
        }
        tracing::debug!("engine stopped");
    }

    /// Text first, then the picture for it. Returns false once the UI is gone.
    fn turn(&mut self, generation: u64, request: &TurnRequest) -> bool {
        tracing::info!(
            action = %request.action,
            opening = request.is_opening(),
            "requesting turn"
        );

        let response = match self.model.generate_turn(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("turn failed: {e}");
                return self.send(EngineResponse::TurnCompleted {
                    generation,
                    result: Err(e.user_message()),
                });
            }
        };

        let image_prompt = response.image_prompt.clone();
        if !self.send(EngineResponse::TurnCompleted {
            generation,
            result: Ok(response),
        }) {
            return false;
        }

        if !self.images_enabled || image_prompt.trim().is_empty() {
            return true;
        }

        let prompt = PromptBuilder::scene_image(&image_prompt);
        let image = self.image_or_placeholder(&prompt, ImageKind::Scene);
        self.send(EngineResponse::ImageReady { generation, image })
    }

    fn item_hint(&mut self, generation: u64, item: Item, player: &Player) -> bool {
        let hint = self.model.describe_item(&item, player).map_err(|e| {
            tracing::warn!(item = %item.name, "item hint failed: {e}");
            e.user_message()
        });
        self.send(EngineResponse::ItemHint {
            generation,
            item: item.name,
            hint,
        })
    }

    fn item_icon(&mut self, generation: u64, item: Item) -> bool {
        let prompt = PromptBuilder::item_icon(&item);
        let icon = self.image_or_placeholder(&prompt, ImageKind::ItemIcon);
        self.send(EngineResponse::ItemIcon {
            generation,
            item: item.name,
            icon,
        })
    }

    fn image_or_placeholder(&self, prompt: &str, kind: ImageKind) -> SceneImage {
        match self.model.generate_image(prompt, kind) {
            Ok((mime, data)) => SceneImage::encoded(mime, data),
            Err(e) => {
                tracing::warn!(?kind, "image generation failed, using placeholder: {e}");
                SceneImage::placeholder()
            }
        }
    }

    fn send(&self, resp: EngineResponse) -> bool {
        self.tx.send(resp).is_ok()
    }
}
