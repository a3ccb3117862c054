use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tvsearch_client::display::{render_details, render_state};
use tvsearch_client::{ApiClient, SearchController};

/// Search TV shows from the terminal. Every line typed is treated as the
/// new contents of the search box.
#[derive(Parser, Debug)]
#[command(name = "tvsearch", version)]
struct Args {
    /// Base URL of the search backend
    #[arg(long, env = "TVSEARCH_API_BASE_URL", default_value = "http://localhost:3001")]
    api_base_url: String,

    /// Quiet period after the last keystroke before searching
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the rendered results.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = ApiClient::new(args.api_base_url);
    info!(base_url = %client.base_url(), "using search backend");

    let handle = SearchController::spawn(Arc::new(client), Duration::from_millis(args.debounce_ms));

    let mut states = handle.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            print!("\n{}", render_state(&state));
        }
    });

    println!("Type to search. Commands: :show <n>, :clear, :quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim_end();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            (":quit", _) => break,
            (":clear", _) => handle.clear(),
            (":show", n) => {
                let state = handle.state();
                match n.parse::<usize>().ok().and_then(|n| state.results().get(n.checked_sub(1)?)) {
                    Some(result) => println!("\n{}", render_details(&result.show)),
                    None => println!("No result #{n}"),
                }
            }
            _ => handle.set_query(line),
        }
    }

    Ok(())
}
