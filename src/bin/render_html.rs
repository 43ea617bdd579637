use anyhow::{Context, Result};
use leaderboard::{config::Config, render::render_files};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("reading configuration")?;
    let bytes = render_files(&config)
        .with_context(|| format!("rendering {}", config.html_path().display()))?;

    info!(bytes, "done");
    Ok(())
}
