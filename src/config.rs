// src/config.rs

use std::{
    env,
    path::PathBuf,
    time::Duration,
};
use url::Url;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://timecopilot-impermanentleaderboard.hf.space";

/// Models published on the leaderboard, in the order the service reports them.
pub static DEFAULT_MODELS: &[&str] = &[
    "AutoARIMA",
    "AutoCES",
    "AutoETS",
    "Chronos",
    "DynamicOptimizedTheta",
    "HistoricAverage",
    "Moirai",
    "Prophet",
    "SeasonalNaive",
    "TiRex",
    "TimesFM",
    "ZeroModel",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed wait schedule for the CRPS job result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSchedule {
    /// Pause between submission and the first poll.
    pub initial_delay: Duration,
    /// Pause after each poll that yielded no table.
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            interval: Duration::from_secs(3),
            max_attempts: 10,
        }
    }
}

/// Everything a run needs to know, built once and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: Url,
    pub models: Vec<String>,
    pub request_timeout: Duration,
    pub poll: PollSchedule,
    /// Project root; artifact paths are resolved against it.
    pub root: PathBuf,
}

impl Config {
    pub fn new(base_url: &str, root: impl Into<PathBuf>) -> Result<Self> {
        // trailing slash so `join` appends rather than replaces the last segment
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        Ok(Self {
            base_url: Url::parse(&base)?,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            request_timeout: REQUEST_TIMEOUT,
            poll: PollSchedule::default(),
            root: root.into(),
        })
    }

    /// Reads `LEADERBOARD_BASE_URL` and `LEADERBOARD_ROOT`, falling back to
    /// the public service and the current directory.
    pub fn from_env() -> Result<Self> {
        let base = env::var("LEADERBOARD_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let root = env::var("LEADERBOARD_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self::new(&base, root)
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_poll(mut self, poll: PollSchedule) -> Self {
        self.poll = poll;
        self
    }

    pub fn config_url(&self) -> Result<Url> {
        Ok(self.base_url.join("config")?)
    }

    pub fn submit_url(&self) -> Result<Url> {
        Ok(self.base_url.join("gradio_api/call/build_table")?)
    }

    pub fn result_url(&self, event_id: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("gradio_api/call/build_table/{}", event_id))?)
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join("data").join("leaderboard.json")
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join("templates").join("dashboard.html")
    }

    pub fn html_path(&self) -> PathBuf {
        self.root.join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path() {
        let cfg = Config::new("http://localhost:7860/space", ".").unwrap();
        assert_eq!(
            cfg.config_url().unwrap().as_str(),
            "http://localhost:7860/space/config"
        );
        assert_eq!(
            cfg.result_url("abc123").unwrap().as_str(),
            "http://localhost:7860/space/gradio_api/call/build_table/abc123"
        );
    }

    #[test]
    fn defaults() {
        let cfg = Config::new(DEFAULT_BASE_URL, "/tmp/x").unwrap();
        assert_eq!(cfg.models.len(), 12);
        assert_eq!(cfg.models[0], "AutoARIMA");
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
        assert_eq!(cfg.poll.max_attempts, 10);
        assert_eq!(cfg.data_path(), PathBuf::from("/tmp/x/data/leaderboard.json"));
        assert_eq!(cfg.html_path(), PathBuf::from("/tmp/x/index.html"));
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(Config::new("not a url", ".").is_err());
    }
}
