use std::env;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use auctioneer_bot::channel::cooldown::Cooldown;
use auctioneer_bot::channel::publisher::ChannelPublisher;
use auctioneer_bot::channel::telegram::TelegramChannel;
use auctioneer_bot::constants::SYNC_INTERVAL_SECS;
use auctioneer_bot::database::bids::PgLeaderResolver;
use auctioneer_bot::database::lots::PgLotStore;
use auctioneer_bot::model::AppState;
use auctioneer_bot::services;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url = env::var("DATABASE_URL").expect("Expected DATABASE_URL in the environment.");
    let token = env::var("BOT_TOKEN").expect("Expected BOT_TOKEN in the environment.");
    let chat_id = env::var("CHANNEL_ID")
        .expect("Expected CHANNEL_ID in the environment.")
        .parse::<i64>()
        .expect("CHANNEL_ID must be a valid number.");
    // Without a bot username channel messages simply carry no deep-link button.
    let bot_username = env::var("BOT_USERNAME").ok();
    let sync_interval = env::var("SYNC_INTERVAL_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(SYNC_INTERVAL_SECS);

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to the database.");

    let publisher = ChannelPublisher::new(
        Arc::new(TelegramChannel::new(token, chat_id)),
        Arc::new(PgLotStore::new(db.clone())),
        Arc::new(PgLeaderResolver::new(db.clone())),
        Arc::new(Cooldown::new()),
        bot_username,
    );

    let state = Arc::new(AppState {
        db,
        publisher,
        sync_interval: Duration::from_secs(sync_interval),
    });

    services::scheduler::run(state).await;
}
