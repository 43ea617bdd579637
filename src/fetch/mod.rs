// src/fetch/mod.rs

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::Result;

pub mod crps;
pub mod mase;

pub use crps::fetch_crps;
pub use mase::fetch_mase;

/// The two request shapes the dashboard needs. Non-2xx answers are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, url: &Url) -> Result<String>;
    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value>;
}

/// Wall-clock waits between polls, swappable so tests don't sleep.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        Ok(self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value> {
        debug!("POST {}", url);
        Ok(self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?)
    }
}
