//! Provision the hosted backend: gallery bucket, tables and row-level security.
//!
//! Run once per project with the service-role key. Re-running is safe.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use edtech_console::config::ConsoleSettings;
use edtech_console::outbound::remote::RemoteClient;
use edtech_console::provisioning::{ProvisioningReport, apply_schema, ensure_gallery_bucket};

/// `provision` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "provision",
    about = "Create the gallery bucket and apply tables and access policies",
    version
)]
struct CliArgs {
    /// Leave storage untouched.
    #[arg(long = "skip-bucket")]
    skip_bucket: bool,
    /// Leave the database schema untouched.
    #[arg(long = "skip-schema")]
    skip_schema: bool,
}

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

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build provisioning runtime")?;
    let report = runtime.block_on(async_main(args))?;

    println!("bucket_created={}", report.bucket_created);
    println!("statements_applied={}", report.statements_applied);
    Ok(())
}

async fn async_main(args: CliArgs) -> Result<ProvisioningReport> {
    let settings = ConsoleSettings::load_from_env("provision")?;

    let bucket_created = if args.skip_bucket {
        false
    } else {
        let client = RemoteClient::new(settings.provisioning_client()?)
            .wrap_err("failed to build storage client")?;
        ensure_gallery_bucket(&client, settings.gallery_bucket()).await?
    };

    let statements_applied = if args.skip_schema {
        0
    } else {
        let database_url = settings.database_url()?;
        tokio::task::spawn_blocking(move || apply_schema(&database_url))
            .await
            .wrap_err("schema task panicked")??
    };

    Ok(ProvisioningReport {
        bucket_created,
        statements_applied,
    })
}
