use std::sync::Arc;

use anyhow::Context;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod model;
mod protocol;
mod services;

use app::runtime::Runtime;
use config::Config;
use services::deepl::DeeplClient;
use services::store::KeyStore;

// consecutive unreadable lines before giving up on stdin
const MAX_READ_ERRORS: u32 = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!(api_url = %config.api_url, store = %config.store_path.display(), "starting deepl-core");

    let client = DeeplClient::new(&config.api_url, config.timeout)
        .context("failed to build HTTP client")?;
    let store = KeyStore::open(&config.store_path);
    let mut runtime = Runtime::new(Arc::new(client), store, config.debounce);

    if let Err(e) = runtime.restore() {
        warn!(error = %e, "could not restore persisted API key");
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut read_errors = 0u32;

    loop {
        let out = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    read_errors = 0;
                    if line.trim().is_empty() {
                        continue;
                    }
                    protocol::handle(&mut runtime, &line)
                }
                Ok(None) => break,
                Err(e) => {
                    read_errors += 1;
                    warn!(error = %e, attempt = read_errors, "failed to read request line");
                    if read_errors >= MAX_READ_ERRORS {
                        anyhow::bail!("stdin keeps failing: {e}");
                    }
                    protocol::input_error()
                }
            },
            msg = runtime.next_message() => match msg {
                Some(msg) => match runtime.dispatch(msg) {
                    Ok(()) => protocol::state_event(runtime.state().view()),
                    Err(e) => {
                        warn!(error = %e, "internal message rejected");
                        continue;
                    }
                },
                None => break,
            },
        };

        stdout
            .write_all(format!("{out}\n").as_bytes())
            .await
            .context("failed to write to stdout")?;
        stdout.flush().await.context("failed to flush stdout")?;
    }

    info!("input closed, shutting down");
    Ok(())
}
