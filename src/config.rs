use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub public_base_url: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_bot_username: String,
    pub telegram_api_url: String,
    pub match_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://santa.db?mode=rwc".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            telegram_bot_username: env::var("TELEGRAM_BOT_USERNAME").unwrap_or_else(|_| "SecretSantaBot".to_string()),
            telegram_api_url: env::var("TELEGRAM_API_URL").unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            match_max_attempts: env::var("MATCH_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("MATCH_MAX_ATTEMPTS must be a positive number"),
        }
    }

    pub fn join_link(&self, code: &str) -> String {
        format!("{}/join/{}", self.public_base_url, code)
    }

    pub fn share_link(&self, share_uuid: &str) -> String {
        format!("{}/share/{}", self.public_base_url, share_uuid)
    }

    pub fn telegram_deep_link(&self, connect_token: &str) -> String {
        format!("https://t.me/{}?start={}", self.telegram_bot_username, connect_token)
    }
}
