use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
}

impl TelegramNotifier {
    pub fn new(api_url: String, bot_token: String) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }
}

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AppError> {
        let payload = SendMessagePayload {
            chat_id,
            text,
            parse_mode: "Markdown",
        };

        // without_url keeps the bot token out of logs
        let res = self.client.post(self.endpoint("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Telegram connection error: {}", e.without_url());
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        let status = res.status();
        let body: Option<TelegramResponse> = res.json().await.ok();

        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            other => {
                let description = other
                    .and_then(|b| b.description)
                    .unwrap_or_else(|| "no description".to_string());
                let msg = format!("Telegram sendMessage failed. Status: {}, Description: {}", status, description);
                error!("{}", msg);
                Err(AppError::InternalWithMsg(msg))
            }
        }
    }
}
