//! Single-attempt HTTP probing.

use std::time::{Duration, Instant};

use tracing::debug;

use pulse_core::config::monitor::MonitorConfig;
use pulse_core::error::AppError;
use pulse_core::result::AppResult;
use pulse_entity::{NewHealthCheck, Site};

/// Issues one timed GET per site and classifies the outcome.
///
/// A probe never retries and never fails: every attempt yields exactly
/// one [`NewHealthCheck`]. Timeouts, refused connections, and transport
/// errors are down-results, not errors.
#[derive(Debug, Clone)]
pub struct SiteProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl SiteProber {
    /// Build a prober with the configured per-request timeout.
    pub fn new(config: &MonitorConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.probe_timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build probe HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Probe `site` once and return the measured outcome.
    ///
    /// The reported latency is capped at the configured timeout, so a
    /// timed-out probe reports exactly the timeout rather than whatever
    /// extra teardown time elapsed.
    pub async fn probe(&self, site: &Site) -> NewHealthCheck {
        let started = Instant::now();
        let outcome = self.client.get(&site.url).send().await;
        let elapsed = started.elapsed().min(self.timeout);
        let response_time_ms = i32::try_from(elapsed.as_millis()).unwrap_or(i32::MAX);

        match outcome {
            Ok(response) => {
                NewHealthCheck::up(site.id, response.status().as_u16(), response_time_ms)
            }
            Err(err) => {
                debug!(site_id = %site.id, url = %site.url, error = %err, "Probe got no response");
                NewHealthCheck::down(site.id, response_time_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use uuid::Uuid;

    fn site_for(url: String) -> Site {
        Site {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            url,
            created_at: Utc::now(),
        }
    }

    fn prober_with_timeout(seconds: u64) -> SiteProber {
        SiteProber::new(&MonitorConfig {
            probe_timeout_seconds: seconds,
            ..MonitorConfig::default()
        })
        .unwrap()
    }

    /// Serve exactly one canned HTTP response on a local port.
    async fn one_shot_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let response =
                format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn success_status_is_up() {
        let url = one_shot_server("200 OK").await;
        let site = site_for(url);

        let check = prober_with_timeout(5).probe(&site).await;

        assert!(check.is_up);
        assert_eq!(check.status_code, Some(200));
        assert_eq!(check.site_id, site.id);
    }

    #[tokio::test]
    async fn server_error_status_is_down_but_recorded() {
        let url = one_shot_server("503 Service Unavailable").await;
        let site = site_for(url);

        let check = prober_with_timeout(5).probe(&site).await;

        assert!(!check.is_up);
        assert_eq!(check.status_code, Some(503));
    }

    #[tokio::test]
    async fn refused_connection_is_down_with_no_status() {
        // Bind then drop: nothing is listening on this port anymore.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let site = site_for(format!("http://{addr}/"));

        let check = prober_with_timeout(5).probe(&site).await;

        assert!(!check.is_up);
        assert_eq!(check.status_code, None);
    }

    #[tokio::test]
    async fn silent_server_times_out_with_capped_latency() {
        // Accepts the connection but never responds.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let site = site_for(format!("http://{addr}/"));
        let hold = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let check = prober_with_timeout(1).probe(&site).await;

        assert!(!check.is_up);
        assert_eq!(check.status_code, None);
        assert!(check.response_time_ms <= 1_000);
        hold.abort();
    }
}
