use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::prompt_builder::PromptBuilder;
use crate::model::player::{Item, Player};
use crate::model::turn::{decode_turn, TurnRequest, TurnResponse};
use crate::ui::settings::LlmSettings;

const IMAGE_MIME: &str = "image/png";

/// What a generated picture is for. Decides the requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Scene,
    ItemIcon,
}

impl ImageKind {
    pub fn size(self) -> &'static str {
        match self {
            ImageKind::Scene => "1792x1024",
            ImageKind::ItemIcon => "1024x1024",
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed model output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model returned no content")]
    EmptyResponse,

    #[error("no image was generated")]
    NoImage,
}

impl LlmError {
    /// The one sentence shown to the player.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::Http(_) => {
                "The Dungeon Master cannot be reached. Check your connection and try again."
                    .into()
            }
            LlmError::Api { status: 401 | 403, .. } => {
                "The Dungeon Master refused to answer. Check your API key.".into()
            }
            LlmError::Api { .. }
            | LlmError::Malformed(_)
            | LlmError::EmptyResponse
            | LlmError::NoImage => {
                "The Dungeon Master is bewildered and cannot respond. Please try another action."
                    .into()
            }
        }
    }
}

/// The remote model, as the engine sees it.
pub trait StoryModel: Send {
    fn generate_turn(&self, request: &TurnRequest) -> Result<TurnResponse, LlmError>;

    /// Base64-encoded image for a finished `prompt`, plus its MIME type.
    fn generate_image(&self, prompt: &str, kind: ImageKind) -> Result<(String, String), LlmError>;

    fn describe_item(&self, item: &Item, player: &Player) -> Result<String, LlmError>;
}

/* =========================
   OpenAI-compatible wire types
   ========================= */

#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub response_format: String,
}

#[derive(Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub b64_json: Option<String>,
}

/* =========================
   HTTP client
   ========================= */

pub struct HttpStoryModel {
    client: Client,
    settings: LlmSettings,
}

impl HttpStoryModel {
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<String, LlmError> {
        let mut req = self.client.post(self.endpoint(path)).json(body);
        if let Some(key) = &self.settings.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    fn chat(&self, system: String, user: String, json: bool) -> Result<String, LlmError> {
        let req = chat_request(&self.settings, system, user, json);
        let body = self.post("chat/completions", &req)?;
        parse_chat_response(&body)
    }
}

impl StoryModel for HttpStoryModel {
    fn generate_turn(&self, request: &TurnRequest) -> Result<TurnResponse, LlmError> {
        let content = self.chat(
            PromptBuilder::turn_instruction(request),
            request.action.clone(),
            true,
        )?;
        Ok(decode_turn(&content, &request.player)?)
    }

    fn generate_image(
        &self,
        prompt: &str,
        kind: ImageKind,
    ) -> Result<(String, String), LlmError> {
        tracing::debug!(?kind, "requesting image");
        let req = ImageRequest {
            model: self.settings.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: kind.size().into(),
            response_format: "b64_json".into(),
        };
        let body = self.post("images/generations", &req)?;
        let data = parse_image_response(&body)?;
        Ok((IMAGE_MIME.to_string(), data))
    }

    fn describe_item(&self, item: &Item, player: &Player) -> Result<String, LlmError> {
        self.chat(
            PromptBuilder::item_hint(item, player),
            item.name.clone(),
            false,
        )
        .map(|hint| hint.trim().to_string())
    }
}

pub fn chat_request(
    settings: &LlmSettings,
    system: String,
    user: String,
    json: bool,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: settings.text_model.clone(),
        temperature: settings.temperature,
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: system,
            },
            ChatMessage {
                role: "user".into(),
                content: user,
            },
        ],
        response_format: json.then(|| ResponseFormat {
            kind: "json_object".into(),
        }),
    }
}

pub fn parse_chat_response(body: &str) -> Result<String, LlmError> {
    let resp: ChatCompletionResponse = serde_json::from_str(body)?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

pub fn parse_image_response(body: &str) -> Result<String, LlmError> {
    let resp: ImageResponse = serde_json::from_str(body)?;
    resp.data
        .into_iter()
        .find_map(|d| d.b64_json)
        .filter(|d| !d.is_empty())
        .ok_or(LlmError::NoImage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_asks_for_json_only_when_needed() {
        let settings = LlmSettings::default();
        let json = serde_json::to_value(chat_request(&settings, "sys".into(), "go".into(), true))
            .unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "go");

        let plain = serde_json::to_value(chat_request(&settings, "s".into(), "u".into(), false))
            .unwrap();
        assert!(plain.get("response_format").is_none());
    }

    #[test]
    fn parses_first_choice() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn empty_choices_are_an_error() {
        assert!(matches!(
            parse_chat_response(r#"{"choices": []}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            parse_chat_response(r#"{"choices": [{"message": {"content": "  "}}]}"#),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_chat_response("<html>502</html>"),
            Err(LlmError::Malformed(_))
        ));
    }

    #[test]
    fn parses_image_payload() {
        assert_eq!(
            parse_image_response(r#"{"data": [{"b64_json": "AQID"}]}"#).unwrap(),
            "AQID"
        );
        assert!(matches!(
            parse_image_response(r#"{"data": []}"#),
            Err(LlmError::NoImage)
        ));
    }

    #[test]
    fn every_error_has_a_message() {
        let errors = [
            LlmError::Api { status: 500, body: "boom".into() },
            LlmError::Api { status: 401, body: String::new() },
            LlmError::EmptyResponse,
            LlmError::NoImage,
            LlmError::Malformed(serde_json::from_str::<u8>("x").unwrap_err()),
        ];
        for e in errors {
            assert!(!e.user_message().is_empty());
        }
        assert!(LlmError::Api { status: 401, body: String::new() }
            .user_message()
            .contains("API key"));
    }
}
