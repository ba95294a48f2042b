//! Telegram Bot API implementation of [`ChannelTransport`].
//!
//! This adapter owns the translation of every raw API failure into the closed
//! [`ChannelError`] set. Telegram reports edit-specific conditions only as
//! description strings, so the string matching lives here and nowhere else.

use crate::channel::transport::{ChannelError, ChannelMessageId, ChannelTransport, LinkButton};
use crate::constants::DEFAULT_RETRY_AFTER_SECS;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ApiParameters>,
}

#[derive(Deserialize)]
struct ApiParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// Map a Bot API error response onto the closed outcome set.
fn classify_api_error(code: i64, description: String, retry_after: Option<u64>) -> ChannelError {
    if code == 429 {
        return ChannelError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        };
    }
    let lower = description.to_lowercase();
    if lower.contains("message is not modified") {
        ChannelError::NotModified
    } else if lower.contains("message to edit not found") {
        ChannelError::NotFound
    } else if lower.contains("there is no text in the message to edit")
        || lower.contains("message to edit has no text")
    {
        ChannelError::NoEditableText
    } else {
        ChannelError::Api { code, description }
    }
}

fn reply_markup(button: Option<&LinkButton>) -> Option<Value> {
    button.map(|b| json!({ "inline_keyboard": [[{ "text": b.label, "url": b.url }]] }))
}

pub struct TelegramChannel {
    http: reqwest::Client,
    token: String,
    chat_id: i64,
}

impl TelegramChannel {
    pub fn new(token: String, chat_id: i64) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            chat_id,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.token)
    }

    async fn call_json(&self, method: &str, payload: Value) -> Result<Value, ChannelError> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn call_multipart(&self, method: &str, form: Form) -> Result<Value, ChannelError> {
        let response = self
            .http
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Value, ChannelError> {
        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| ChannelError::Transport("api response had no result".to_string()))
        } else {
            Err(classify_api_error(
                envelope.error_code.unwrap_or(0),
                envelope.description.unwrap_or_default(),
                envelope.parameters.and_then(|p| p.retry_after),
            ))
        }
    }

    async fn photo_part(path: &Path) -> Result<Part, ChannelError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ChannelError::Transport(format!("read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Part::bytes(bytes).file_name(file_name))
    }

    fn message_id(result: &Value) -> Result<ChannelMessageId, ChannelError> {
        result["message_id"]
            .as_i64()
            .map(ChannelMessageId)
            .ok_or_else(|| ChannelError::Transport("response missing message_id".to_string()))
    }
}

#[async_trait]
impl ChannelTransport for TelegramChannel {
    async fn send_text(
        &self,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<ChannelMessageId, ChannelError> {
        let mut payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = reply_markup(button) {
            payload["reply_markup"] = markup;
        }
        let result = self.call_json("sendMessage", payload).await?;
        Self::message_id(&result)
    }

    async fn send_photo(
        &self,
        photo: &Path,
        caption: &str,
        button: Option<&LinkButton>,
    ) -> Result<ChannelMessageId, ChannelError> {
        let mut form = Form::new()
            .text("chat_id", self.chat_id.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", "HTML")
            .part("photo", Self::photo_part(photo).await?);
        if let Some(markup) = reply_markup(button) {
            form = form.text("reply_markup", markup.to_string());
        }
        let result = self.call_multipart("sendPhoto", form).await?;
        Self::message_id(&result)
    }

    async fn send_album(&self, photos: &[PathBuf]) -> Result<ChannelMessageId, ChannelError> {
        let mut form = Form::new().text("chat_id", self.chat_id.to_string());
        let mut media = Vec::with_capacity(photos.len());
        for (index, path) in photos.iter().enumerate() {
            let attach_name = format!("photo{index}");
            media.push(json!({
                "type": "photo",
                "media": format!("attach://{attach_name}"),
            }));
            form = form.part(attach_name, Self::photo_part(path).await?);
        }
        form = form.text("media", Value::Array(media).to_string());

        let result = self.call_multipart("sendMediaGroup", form).await?;
        // sendMediaGroup returns the whole batch; the album's identity is its
        // first message, though callers record the follow-up text message.
        result
            .as_array()
            .and_then(|messages| messages.first())
            .map(Self::message_id)
            .transpose()?
            .ok_or_else(|| ChannelError::Transport("empty sendMediaGroup response".to_string()))
    }

    async fn edit_text(
        &self,
        message_id: ChannelMessageId,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<(), ChannelError> {
        let mut payload = json!({
            "chat_id": self.chat_id,
            "message_id": message_id.0,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = reply_markup(button) {
            payload["reply_markup"] = markup;
        }
        self.call_json("editMessageText", payload).await.map(|_| ())
    }

    async fn edit_caption(
        &self,
        message_id: ChannelMessageId,
        caption: &str,
        button: Option<&LinkButton>,
    ) -> Result<(), ChannelError> {
        let mut payload = json!({
            "chat_id": self.chat_id,
            "message_id": message_id.0,
            "caption": caption,
            "parse_mode": "HTML",
        });
        if let Some(markup) = reply_markup(button) {
            payload["reply_markup"] = markup;
        }
        self.call_json("editMessageCaption", payload)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_carries_retry_after() {
        let err = classify_api_error(429, "Too Many Requests: retry later".into(), Some(17));
        match err {
            ChannelError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 17),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_without_hint_uses_default() {
        let err = classify_api_error(429, "Too Many Requests".into(), None);
        match err {
            ChannelError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, DEFAULT_RETRY_AFTER_SECS)
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn edit_conditions_are_classified() {
        assert!(matches!(
            classify_api_error(400, "Bad Request: message is not modified".into(), None),
            ChannelError::NotModified
        ));
        assert!(matches!(
            classify_api_error(400, "Bad Request: message to edit not found".into(), None),
            ChannelError::NotFound
        ));
        assert!(matches!(
            classify_api_error(
                400,
                "Bad Request: there is no text in the message to edit".into(),
                None
            ),
            ChannelError::NoEditableText
        ));
    }

    #[test]
    fn unknown_errors_stay_opaque() {
        let err = classify_api_error(400, "Bad Request: chat not found".into(), None);
        assert!(matches!(err, ChannelError::Api { code: 400, .. }));
        assert!(err.is_transient());
    }
}
