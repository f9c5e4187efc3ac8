// Squad Stats Bot - Rust Edition
// Posts a Battlefield squad leaderboard to Discord

mod api;
mod commands;
mod features;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::gametools::GameToolsClient;
use crate::features::interactions::{self, Ed25519Verifier};
use crate::features::leaderboard::StatsAggregator;
use crate::features::poster::{self, ChannelSink};
use crate::models::roster::Roster;
use crate::utils::config::Config;

/// User data shared across all commands
pub struct Data {
    pub stats_client: Arc<GameToolsClient>,
    pub aggregator: Arc<StatsAggregator>,
    pub squad_handles: Vec<String>,
}

// Manual Debug impl since the API clients don't impl Debug
impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("stats_client", &"GameToolsClient")
            .field("aggregator", &"StatsAggregator")
            .field("squad_handles", &self.squad_handles)
            .finish()
    }
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::ping::test(),
        commands::squad::squad(),
        commands::lookup::lookup(),
        commands::help::help(),
    ]
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "squad_stats_bot=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    info!("Starting Squad Stats Bot (Rust Edition)...");

    let roster = match &config.roster_path {
        Some(path) => Roster::from_file(path).expect("Failed to load roster"),
        None => Roster::builtin(),
    };
    if roster.is_empty() {
        warn!("Roster is empty, the leaderboard will have no players");
    }
    info!(players = roster.len(), "Roster loaded");

    let squad_handles = config
        .squad_handles
        .clone()
        .unwrap_or_else(|| roster.handles());

    // Build HTTP client for API calls
    let http_client = reqwest::Client::builder()
        .user_agent("SquadStats-Bot/1.0")
        .build()
        .expect("Failed to create HTTP client");

    let stats_client = Arc::new(GameToolsClient::new(
        http_client,
        config.stats_api_base.clone(),
        config.stats_timeout,
    ));
    let aggregator = Arc::new(StatsAggregator::new(Arc::new(roster), stats_client.clone()));

    // HTTP interactions endpoint, only when a public key is configured
    if let Some(public_key) = &config.public_key {
        let verifier = Arc::new(Ed25519Verifier::new(public_key).expect("Invalid PUBLIC_KEY"));
        let port = config.port;
        tokio::spawn(async move {
            if let Err(e) = interactions::serve(port, verifier).await {
                error!("Interactions endpoint stopped: {:?}", e);
            }
        });
    }

    let leaderboard_channel_id = config.leaderboard_channel_id;
    let leaderboard_interval = config.leaderboard_interval;

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("s!".into()),
                ..Default::default()
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx.say(format!("❌ Error: {}", error)).await;
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully!");

                match leaderboard_channel_id {
                    Some(channel_id) => {
                        let sink = Arc::new(ChannelSink::new(ctx.http.clone()));
                        tokio::spawn(poster::run_poster(
                            aggregator.clone(),
                            sink,
                            channel_id,
                            squad_handles.clone(),
                            leaderboard_interval,
                        ));
                        info!(channel_id, "Scheduled leaderboard posts enabled");
                    }
                    None => info!("LEADERBOARD_CHANNEL_ID not set, scheduled posts disabled"),
                }

                Ok(Data {
                    stats_client,
                    aggregator,
                    squad_handles,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS;

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .expect("Failed to create client");

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to register Ctrl+C handler");
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    info!("Goodbye!");
}
