//! Console entry-point: loads configuration, wires the hosted backend and runs
//! one CLI command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use edtech_console::config::ConsoleSettings;
use edtech_console::context::{ConsoleContext, ConsolePorts};
use edtech_console::inbound::cli::{Cli, FeedSettings, run};
use edtech_console::outbound::remote::RemoteClient;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build console runtime")?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let settings = ConsoleSettings::load_from_env("edtech-console")?;
    let client = RemoteClient::new(settings.console_client()?)
        .wrap_err("failed to build backend client")?;
    let context = ConsoleContext::start(
        ConsolePorts::remote(Arc::new(client)),
        Arc::new(DefaultClock),
        settings.gallery_bucket(),
    );
    context.session().settled().await;

    let feed = FeedSettings {
        limit: settings.notice_limit(),
        period: settings.notice_refresh_interval(),
    };
    let mut stdout = io::stdout().lock();
    let outcome = run(cli, &context, feed, &mut stdout).await;
    context.shutdown();
    outcome?;
    stdout.flush()?;
    Ok(())
}
