use std::io::BufRead;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use core_mechanics::config::{ReserveGold, RuleConfig};
use splendor_server::{
    config::HostConfig,
    handler::handle_request,
    message::{Request, Response},
    store::GameStore,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Splendor Server
///
/// Hosts Splendor games. Reads one JSON request per line on stdin and
/// answers with one JSON response per line on stdout.
#[derive(Parser, Debug)]
struct Args {
    /// Seed used to deal every new game. By default, each game gets a random seed.
    #[clap(short, long)]
    seed: Option<u64>,
    /// Tokens a player may hold at the end of a turn.
    #[clap(long, default_value_t = RuleConfig::DEFAULT_MAX_TOKENS_PER_PLAYER)]
    max_tokens: u8,
    /// Prestige that starts the last round.
    #[clap(long, default_value_t = RuleConfig::DEFAULT_WINNING_PRESTIGE)]
    winning_prestige: u8,
    /// What reserving a card does when the gold pool is empty.
    #[clap(long, value_enum, default_value_t = ReserveGoldArg::WhenAvailable)]
    reserve_gold: ReserveGoldArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReserveGoldArg {
    WhenAvailable,
    Required,
}

impl From<ReserveGoldArg> for ReserveGold {
    fn from(arg: ReserveGoldArg) -> Self {
        match arg {
            ReserveGoldArg::WhenAvailable => ReserveGold::WhenAvailable,
            ReserveGoldArg::Required => ReserveGold::Required,
        }
    }
}

impl Args {
    fn host_config(&self) -> HostConfig {
        let rules = RuleConfig {
            max_tokens_per_player: self.max_tokens,
            winning_prestige: self.winning_prestige,
            ..RuleConfig::default()
        }
        .with_reserve_gold(self.reserve_gold.into());
        HostConfig::new(rules, self.seed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries responses only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = args.host_config();
    info!(?config, "> waiting for requests on stdin");

    listen_for_requests(GameStore::new(), config).await
}

async fn listen_for_requests(store: GameStore, config: HostConfig) -> Result<()> {
    let (line_tx, mut line_rx) = tokio::sync::mpsc::channel(1);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        if let Err(e) = input_loop(stdin.lock(), line_tx) {
            warn!("stopped reading stdin: {:#}", e);
        }
    });

    while let Some(line) = line_rx.recv().await {
        if line.trim().is_empty() {
            continue;
        }
        let response = match Request::from_bytes(line.as_bytes()) {
            Ok(request) => handle_request(&store, &config, request).await,
            Err(decoding_error) => {
                warn!("malformatted json: {}", decoding_error);
                Response::error(format!("malformatted json: {}", decoding_error))
            }
        };
        println!("{}", response.to_json()?);
    }

    info!("stdin closed, shutting down");
    Ok(())
}

fn input_loop(
    mut input: impl BufRead,
    line_tx: tokio::sync::mpsc::Sender<String>,
) -> Result<()> {
    let mut buffer = String::new();
    loop {
        if input.read_line(&mut buffer)? == 0 {
            return Ok(());
        }
        line_tx.blocking_send(buffer.clone())?;
        buffer.clear();
    }
}
