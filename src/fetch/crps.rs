// src/fetch/crps.rs

use serde_json::{json, Value};
use tracing::{debug, info, instrument, trace};

use super::{Sleeper, Transport};
use crate::config::Config;
use crate::error::{LeaderboardError, Result};
use crate::process::RawTable;

pub const METRIC: &str = "scaled_crps";
/// Scope markers meaning "every subdataset" and "every frequency".
const ALL: &str = "All";

pub fn job_payload(models: &[String]) -> Value {
    json!({ "data": [METRIC, ALL, ALL, models] })
}

/// Find the first `data: ` line whose JSON is a non-empty list led by a
/// table. Lines that are not valid JSON are skipped.
pub fn table_from_event_stream(body: &str) -> Option<RawTable> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .filter_map(|payload| match serde_json::from_str::<Value>(payload) {
            Ok(v) => Some(v),
            Err(e) => {
                trace!(error = %e, "skipping non-JSON data line");
                None
            }
        })
        .find_map(|v| v.as_array()?.first().and_then(RawTable::from_value))
}

/// Submit the build_table job and return its event id.
pub async fn submit_job(transport: &dyn Transport, config: &Config) -> Result<String> {
    let url = config.submit_url()?;
    let resp = transport.post_json(&url, &job_payload(&config.models)).await?;
    let event_id = resp
        .get("event_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(LeaderboardError::SubmissionError)?;
    info!(event_id, "job submitted");
    Ok(event_id.to_string())
}

/// Poll the job result on the configured schedule until a table shows up.
pub async fn poll_result(
    transport: &dyn Transport,
    sleeper: &dyn Sleeper,
    config: &Config,
    event_id: &str,
) -> Result<RawTable> {
    let schedule = config.poll;
    let url = config.result_url(event_id)?;

    sleeper.sleep(schedule.initial_delay).await;
    for attempt in 1..=schedule.max_attempts {
        let body = transport.get_text(&url).await?;
        debug!(attempt, bytes = body.len(), "poll response");
        if let Some(table) = table_from_event_stream(&body) {
            info!(rows = table.data.len(), "found CRPS table");
            return Ok(table);
        }
        info!("attempt {}/{}: waiting for result", attempt, schedule.max_attempts);
        sleeper.sleep(schedule.interval).await;
    }

    Err(LeaderboardError::PollTimeout {
        attempts: schedule.max_attempts,
    })
}

#[instrument(level = "info", skip_all)]
pub async fn fetch_crps(
    transport: &dyn Transport,
    sleeper: &dyn Sleeper,
    config: &Config,
) -> Result<RawTable> {
    info!("fetching SCALED_CRPS data");
    let event_id = submit_job(transport, config).await?;
    poll_result(transport, sleeper, config, &event_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::config::PollSchedule;
    use std::{
        collections::VecDeque,
        io,
        sync::Mutex,
        time::Duration,
    };
    use url::Url;

    const TABLE_LINE: &str = r#"data: [{"headers": ["subdataset", "frequency", "cutoff", "A"], "data": [["s1", "H", "2026-01-01-00", 0.5]]}]"#;

    /// Replays queued GET bodies and a fixed POST answer.
    struct Scripted {
        post: Value,
        gets: Mutex<VecDeque<String>>,
        posted: Mutex<Vec<(Url, Value)>>,
        fetched: Mutex<Vec<Url>>,
        /// 1-based GET that answers with a connection error.
        fail_get: Option<usize>,
    }

    impl Scripted {
        fn new(post: Value, gets: &[&str]) -> Self {
            Self {
                post,
                gets: Mutex::new(gets.iter().map(|s| s.to_string()).collect()),
                posted: Mutex::new(Vec::new()),
                fetched: Mutex::new(Vec::new()),
                fail_get: None,
            }
        }

        fn failing_on_get(mut self, n: usize) -> Self {
            self.fail_get = Some(n);
            self
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn get_text(&self, url: &Url) -> Result<String> {
            let mut fetched = self.fetched.lock().unwrap();
            fetched.push(url.clone());
            if self.fail_get == Some(fetched.len()) {
                return Err(LeaderboardError::Io(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }
            Ok(self.gets.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn post_json(&self, url: &Url, body: &Value) -> Result<Value> {
            self.posted.lock().unwrap().push((url.clone(), body.clone()));
            Ok(self.post.clone())
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Duration>>);

    #[async_trait]
    impl Sleeper for Recorder {
        async fn sleep(&self, duration: Duration) {
            self.0.lock().unwrap().push(duration);
        }
    }

    fn config() -> Config {
        Config::new("http://dash.test", ".")
            .unwrap()
            .with_models(["A", "B"])
    }

    #[test]
    fn payload_shape() {
        let p = job_payload(&["A".to_string(), "B".to_string()]);
        assert_eq!(p, json!({"data": ["scaled_crps", "All", "All", ["A", "B"]]}));
    }

    #[test]
    fn parses_event_stream() {
        let body = format!(
            "event: generating\ndata: not json\ndata: [\"x\"]\ndata: []\r\nevent: complete\r\n{}\r\n",
            TABLE_LINE
        );
        let table = table_from_event_stream(&body).unwrap();
        assert_eq!(table.headers.len(), 4);
        assert_eq!(table.data.len(), 1);
    }

    #[test]
    fn event_stream_without_table() {
        assert!(table_from_event_stream("event: heartbeat\ndata: null\n").is_none());
        assert!(table_from_event_stream("").is_none());
        // prefix must include the space
        assert!(table_from_event_stream(&TABLE_LINE.replacen("data: ", "data:", 1)).is_none());
    }

    #[tokio::test]
    async fn submits_then_polls_until_ready() {
        let transport = Scripted::new(
            json!({"event_id": "ev1"}),
            &["event: pending\n", "data: {oops\n", TABLE_LINE],
        );
        let sleeper = Recorder::default();
        let table = fetch_crps(&transport, &sleeper, &config()).await.unwrap();
        assert_eq!(table.data.len(), 1);

        let posted = transport.posted.lock().unwrap();
        assert_eq!(posted[0].0.as_str(), "http://dash.test/gradio_api/call/build_table");
        assert_eq!(posted[0].1, job_payload(&config().models));

        let fetched = transport.fetched.lock().unwrap();
        assert_eq!(fetched.len(), 3);
        assert!(fetched
            .iter()
            .all(|u| u.as_str() == "http://dash.test/gradio_api/call/build_table/ev1"));

        let waits = sleeper.0.lock().unwrap();
        assert_eq!(
            *waits,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(3),
                Duration::from_secs(3)
            ]
        );
    }

    #[tokio::test]
    async fn missing_event_id() {
        for post in [json!({}), json!({"event_id": ""}), json!({"event_id": null})] {
            let transport = Scripted::new(post, &[]);
            let err = fetch_crps(&transport, &Recorder::default(), &config())
                .await
                .unwrap_err();
            assert!(matches!(err, LeaderboardError::SubmissionError));
            assert!(transport.fetched.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let transport = Scripted::new(json!({"event_id": "ev2"}), &[]);
        let sleeper = Recorder::default();
        let err = fetch_crps(&transport, &sleeper, &config()).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::PollTimeout { attempts: 10 }));
        assert_eq!(transport.fetched.lock().unwrap().len(), 10);

        let waits = sleeper.0.lock().unwrap();
        assert_eq!(waits.len(), 11);
        assert_eq!(waits.iter().sum::<Duration>(), Duration::from_secs(31));
    }

    #[tokio::test]
    async fn http_error_mid_poll_is_fatal() {
        let transport =
            Scripted::new(json!({"event_id": "ev3"}), &["event: pending\n"]).failing_on_get(2);
        let sleeper = Recorder::default();
        let err = fetch_crps(&transport, &sleeper, &config()).await.unwrap_err();
        assert!(
            matches!(err, LeaderboardError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset)
        );

        // no third GET, no wait after the failure
        assert_eq!(transport.fetched.lock().unwrap().len(), 2);
        assert_eq!(
            *sleeper.0.lock().unwrap(),
            vec![Duration::from_secs(1), Duration::from_secs(3)]
        );
    }

    #[tokio::test]
    async fn follows_custom_schedule() {
        let schedule = PollSchedule {
            initial_delay: Duration::from_millis(5),
            interval: Duration::from_millis(20),
            max_attempts: 3,
        };
        let cfg = config().with_poll(schedule);
        let transport = Scripted::new(json!({"event_id": "ev4"}), &[]);
        let sleeper = Recorder::default();
        let err = fetch_crps(&transport, &sleeper, &cfg).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::PollTimeout { attempts: 3 }));
        assert_eq!(transport.fetched.lock().unwrap().len(), 3);
        assert_eq!(
            *sleeper.0.lock().unwrap(),
            vec![
                Duration::from_millis(5),
                Duration::from_millis(20),
                Duration::from_millis(20),
                Duration::from_millis(20)
            ]
        );
    }
}
