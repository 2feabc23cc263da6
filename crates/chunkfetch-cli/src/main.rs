use anyhow::{Context, Result};
use chunkfetch::{DownloadCoordinator, ReqwestClient};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::App;
use crate::tracker::ProgressTracker;

mod cli;
mod tracker;

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(app.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let request = app.request().context("invalid download request")?;

    let tracker = ProgressTracker::new(!app.no_progress && !app.quiet);
    let options = app.options().on_progress(tracker.callback());
    tracing::debug!(url = %request.url(), ?options, "resolved options");

    let client = ReqwestClient::with_settings(app.client_settings()).context("failed to build http client")?;
    let coordinator = DownloadCoordinator::on_disk(client, request, options)?;

    match coordinator.run().await {
        Ok(path) => {
            tracker.finish(Some("done".to_string()));
            println!("{}", path.display());
            Ok(())
        }
        Err(err) => {
            tracker.abandon();
            let (code, name) = (err.code(), err.name());
            Err(anyhow::Error::new(err).context(format!("download failed [{code} {name}]")))
        }
    }
}
