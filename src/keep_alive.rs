use log::{debug, info};
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// One ping. Failures are only logged.
pub async fn ping_once(http: &reqwest::Client, url: &str) -> bool {
    match http.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            debug!("keep-alive {} -> {}", url, response.status());
            true
        }
        Ok(response) => {
            debug!("keep-alive {} answered {}", url, response.status());
            false
        }
        Err(e) => {
            debug!("keep-alive {} failed: {}", url, e);
            false
        }
    }
}

/// Pings `url` every `every`, starting one interval from now. Never retries.
pub fn spawn_keep_alive(http: reqwest::Client, url: String, every: Duration) -> JoinHandle<()> {
    info!("Keep-alive ping to {} every {:?}", url, every);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            ping_once(&http, &url).await;
        }
    })
}
