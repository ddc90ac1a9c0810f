use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{
    EventRepository, NotificationLogRepository, Notifier, ParticipantRepository, UserRepository,
    WishlistRepository,
};
use crate::domain::services::{
    matching::MatchingService,
    notification_service::{load_message_templates, NotificationService},
};
use crate::infra::telegram::{log_notifier::LogNotifier, telegram_notifier::TelegramNotifier};
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_notification_log_repo::PostgresNotificationLogRepo,
    postgres_participant_repo::PostgresParticipantRepo, postgres_user_repo::PostgresUserRepo,
    postgres_wishlist_repo::PostgresWishlistRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_notification_log_repo::SqliteNotificationLogRepo,
    sqlite_participant_repo::SqliteParticipantRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_wishlist_repo::SqliteWishlistRepo,
};

pub struct Repositories {
    pub user_repo: Arc<dyn UserRepository>,
    pub wishlist_repo: Arc<dyn WishlistRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub participant_repo: Arc<dyn ParticipantRepository>,
    pub notification_log_repo: Arc<dyn NotificationLogRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            wishlist_repo: Arc::new(PostgresWishlistRepo::new(pool.clone())),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            participant_repo: Arc::new(PostgresParticipantRepo::new(pool.clone())),
            notification_log_repo: Arc::new(PostgresNotificationLogRepo::new(pool)),
        }
    }

    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            wishlist_repo: Arc::new(SqliteWishlistRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            participant_repo: Arc::new(SqliteParticipantRepo::new(pool.clone())),
            notification_log_repo: Arc::new(SqliteNotificationLogRepo::new(pool)),
        }
    }
}

pub fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    match &config.telegram_bot_token {
        Some(token) => {
            info!("Telegram notifications enabled via {}", config.telegram_api_url);
            Arc::new(TelegramNotifier::new(config.telegram_api_url.clone(), token.clone()))
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN not set, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    }
}

pub fn assemble_state(config: &Config, repos: Repositories, notifier: Arc<dyn Notifier>) -> AppState {
    let templates = Arc::new(load_message_templates().expect("Failed to load message templates"));

    let matching_service = Arc::new(MatchingService::new(
        repos.event_repo.clone(),
        repos.participant_repo.clone(),
        config.match_max_attempts,
    ));
    let notification_service = Arc::new(NotificationService::new(
        repos.user_repo.clone(),
        repos.notification_log_repo.clone(),
        notifier,
        templates,
    ));

    AppState {
        config: config.clone(),
        user_repo: repos.user_repo,
        wishlist_repo: repos.wishlist_repo,
        event_repo: repos.event_repo,
        participant_repo: repos.participant_repo,
        notification_log_repo: repos.notification_log_repo,
        matching_service,
        notification_service,
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let notifier = build_notifier(config);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(config, Repositories::postgres(pool), notifier)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(config, Repositories::sqlite(pool), notifier)
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
