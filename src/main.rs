use anyhow::{Context, Result};
use leaderboard::{
    config::Config,
    fetch::{HttpTransport, TokioSleeper},
    pipeline::{collect_dataset, write_dataset},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::from_env().context("reading configuration")?;
    let transport = HttpTransport::new(&config).context("building HTTP client")?;

    // ─── 3) fetch + transform ────────────────────────────────────────
    let dataset = collect_dataset(&transport, &TokioSleeper, &config)
        .await
        .context("collecting leaderboard data")?;

    // ─── 4) write ────────────────────────────────────────────────────
    write_dataset(&config, &dataset)
        .with_context(|| format!("writing {}", config.data_path().display()))?;

    info!("all done");
    Ok(())
}
