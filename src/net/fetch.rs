//! Browser transport over `window.fetch`

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::api::{ApiCall, FORM_CONTENT_TYPE, decode_reply};
use super::error::SyncError;
use crate::sim::GameSnapshot;

impl From<JsValue> for SyncError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value));
        SyncError::Transport(message)
    }
}

/// HTTP client bound to one game
#[derive(Debug, Clone)]
pub struct StateSync {
    base_url: String,
    game_id: String,
}

impl StateSync {
    /// `base_url` may be empty for same-origin requests
    pub fn new(base_url: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            game_id: game_id.into(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub async fn fetch_snapshot(&self) -> Result<GameSnapshot, SyncError> {
        self.round_trip(ApiCall::Fetch).await
    }

    pub async fn reveal(&self, x: u32, y: u32) -> Result<GameSnapshot, SyncError> {
        self.round_trip(ApiCall::Reveal { x, y }).await
    }

    pub async fn toggle_flag(&self, x: u32, y: u32) -> Result<GameSnapshot, SyncError> {
        self.round_trip(ApiCall::ToggleFlag { x, y }).await
    }

    pub async fn advance_time(&self, seconds: u32) -> Result<GameSnapshot, SyncError> {
        self.round_trip(ApiCall::AdvanceTime { seconds }).await
    }

    pub async fn reset(&self) -> Result<GameSnapshot, SyncError> {
        self.round_trip(ApiCall::Reset).await
    }

    /// Issue `call` through the matching operation
    pub async fn send(&self, call: ApiCall) -> Result<GameSnapshot, SyncError> {
        match call {
            ApiCall::Fetch => self.fetch_snapshot().await,
            ApiCall::Reveal { x, y } => self.reveal(x, y).await,
            ApiCall::ToggleFlag { x, y } => self.toggle_flag(x, y).await,
            ApiCall::AdvanceTime { seconds } => self.advance_time(seconds).await,
            ApiCall::Reset => self.reset().await,
        }
    }

    /// Perform one round trip. No retries.
    async fn round_trip(&self, call: ApiCall) -> Result<GameSnapshot, SyncError> {
        let url = format!("{}{}", self.base_url, call.path(&self.game_id));

        let init = RequestInit::new();
        init.set_method(call.method().as_str());
        let body = call.body();
        if let Some(ref body) = body {
            init.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &init)?;
        if body.is_some() {
            request.headers().set("Content-Type", FORM_CONTENT_TYPE)?;
        }

        let window =
            web_sys::window().ok_or_else(|| SyncError::Transport("no window".to_string()))?;
        let reply = JsFuture::from(window.fetch_with_request(&request)).await?;
        let response: Response = reply.dyn_into()?;

        let status = response.status();
        let text = JsFuture::from(response.text()?).await?;
        let text = text.as_string().unwrap_or_default();

        decode_reply(status, &text)
    }
}
