use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use pinbank::api::{self, AppState};
use pinbank::config::Config;
use pinbank::csv::{read_accounts, read_transfers, write_accounts};
use pinbank::{AccountStore, Engine};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: pinbank [serve | replay <transfers.csv>]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;

    let store = match &config.seed_file {
        Some(path) => {
            let accounts = read_accounts(path)?;
            info!(path = %path.display(), accounts = accounts.len(), "seeding accounts from file");
            AccountStore::with_accounts(accounts)?
        }
        None => AccountStore::seeded(),
    };
    let engine = Engine::new(store);

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        None | Some("serve") => {
            let state = AppState::new(Arc::new(engine), config.expose_pins);
            api::serve(config.listen_addr, state).await?;
        }
        Some("replay") => {
            let path = args.next().context(USAGE)?;
            replay(&engine, &path).await?;
        }
        Some(other) => bail!("unknown command '{other}'\n{USAGE}"),
    }

    Ok(())
}

/// Apply every transfer in `path`, then print the resulting balances as csv.
async fn replay(engine: &Engine, path: &str) -> anyhow::Result<()> {
    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let orders = read_transfers(PathBuf::from(path))?;
    let (order_sender, order_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in orders {
            match result {
                Ok(order) => {
                    if order_sender.send(order).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine.run(ReceiverStream::new(order_receiver)).await;

    write_accounts(io::stdout().lock(), &engine.accounts())?;
    Ok(())
}
