//! Chatroom server with a stock quote bot.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin quoteroom-server
//! cargo run --bin quoteroom-server -- --port 3000 --room r1:Room1 --room r2:Room2
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use quoteroom_server::{
    app::App,
    config::{
        DEFAULT_BOT_ID, DEFAULT_BOT_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_WORKER_COUNT,
        RoomSeed, ServerConfig,
    },
    connection::DEFAULT_OUTBOUND_CAPACITY,
    domain::DEFAULT_HISTORY_LIMIT,
    infrastructure::{
        queue::inmemory::DEFAULT_TOPIC_CAPACITY,
        quote::{
            StooqQuoteSource,
            stooq::{DEFAULT_QUOTE_ENDPOINT, DEFAULT_QUOTE_TIMEOUT},
        },
    },
};
use quoteroom_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "quoteroom-server")]
#[command(about = "Chatroom server with a queue-backed stock quote bot", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Room to create at startup, as `id:name` (repeatable)
    #[arg(long = "room", value_name = "ID:NAME", default_value = "general:General")]
    rooms: Vec<RoomSeed>,

    /// Messages replayed to a client when it joins a room
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Messages buffered per client before it is dropped as slow
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,

    /// Capacity of each command queue topic
    #[arg(long, default_value_t = DEFAULT_TOPIC_CAPACITY)]
    queue_capacity: usize,

    /// Number of command workers
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// Base URL of the CSV quote service
    #[arg(long, default_value = DEFAULT_QUOTE_ENDPOINT)]
    quote_endpoint: String,

    /// Timeout of a single quote lookup, in seconds
    #[arg(long, default_value_t = DEFAULT_QUOTE_TIMEOUT.as_secs())]
    quote_timeout_secs: u64,

    /// User id of the quote bot
    #[arg(long, default_value = DEFAULT_BOT_ID)]
    bot_id: String,

    /// Display name of the quote bot
    #[arg(long, default_value = DEFAULT_BOT_NAME)]
    bot_name: String,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = ServerConfig {
            host: self.host,
            port: self.port,
            rooms: self.rooms.into_iter().map(|RoomSeed(room)| room).collect(),
            queue_capacity: self.queue_capacity,
            workers: self.workers,
            quote_endpoint: self.quote_endpoint,
            quote_timeout: Duration::from_secs(self.quote_timeout_secs),
            bot: ServerConfig::bot_user(&self.bot_id, &self.bot_name)?,
            ..ServerConfig::default()
        };
        config.hub.history_limit = self.history_limit;
        config.connection.outbound_capacity = self.outbound_capacity;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize dependencies in order:
    // 1. Quote source
    // 2. Repository, hubs, queue and UseCases
    // 3. Workers
    // 4. Server
    let quotes = match StooqQuoteSource::new(config.quote_endpoint.clone(), config.quote_timeout)
    {
        Ok(quotes) => Arc::new(quotes),
        Err(e) => {
            tracing::error!("Failed to create quote client: {}", e);
            std::process::exit(1);
        }
    };
    let app = App::new(config, quotes, Arc::new(SystemClock));
    let workers = app.spawn_workers();

    let (host, port) = (app.config().host.clone(), app.config().port);
    let result = app.server().run(host, port).await;

    // The HTTP side is down; let the workers finish what is queued
    app.shutdown(workers).await;

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
