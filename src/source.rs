use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::config::AppConfig;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Anything that can hand back the HTML of a page.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_page(&self, url: &str) -> Result<String> {
        (**self).fetch_page(url)
    }
}

impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    fn fetch_page(&self, url: &str) -> Result<String> {
        (**self).fetch_page(url)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn fetch_page(&self, url: &str) -> Result<String> {
        (**self).fetch_page(url)
    }
}

/// Outcome of a single attempt that failed.
#[derive(Debug)]
pub enum AttemptError {
    /// Worth trying again after a pause (timeouts, 429, 5xx).
    Transient(anyhow::Error),
    /// Retrying will not help (404, malformed URL, ...).
    Permanent(anyhow::Error),
}

/// Runs `operation` up to `max_attempts` times, sleeping `base_delay * 2^attempt`
/// between transient failures.
pub fn with_retry<T, F>(max_attempts: u32, base_delay: Duration, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> std::result::Result<T, AttemptError>,
{
    let max_attempts = max_attempts.max(1);
    let mut last_error = None;
    for attempt in 0..max_attempts {
        match operation(attempt) {
            Ok(value) => return Ok(value),
            Err(AttemptError::Permanent(err)) => return Err(err),
            Err(AttemptError::Transient(err)) => {
                tracing::warn!("attempt {} of {} failed: {err:#}", attempt + 1, max_attempts);
                last_error = Some(err);
                if attempt + 1 < max_attempts {
                    thread::sleep(base_delay.saturating_mul(2u32.saturating_pow(attempt)));
                }
            }
        }
    }
    Err(last_error
        .unwrap_or_else(|| anyhow!("no attempts made"))
        .context(format!("giving up after {max_attempts} attempts")))
}

/// Blocking HTTP page source with a request timeout and retry-with-backoff.
#[derive(Debug)]
pub struct HttpPageSource {
    client: OnceCell<Client>,
    timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            client: OnceCell::new(),
            timeout,
            max_attempts,
            backoff,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.timeout, config.fetch_attempts, config.retry_backoff)
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.timeout)
                .build()
                .context("failed to build http client")
        })
    }

    fn fetch_once(&self, client: &Client, url: &str) -> std::result::Result<String, AttemptError> {
        let resp = client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .map_err(|err| AttemptError::Transient(anyhow::Error::new(err).context("request failed")))?;

        let status = resp.status();
        if !status.is_success() {
            let err = anyhow!("http {status} for {url}");
            return Err(if is_transient_status(status) {
                AttemptError::Transient(err)
            } else {
                AttemptError::Permanent(err)
            });
        }

        resp.text()
            .map_err(|err| AttemptError::Transient(anyhow::Error::new(err).context("failed reading body")))
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(&self, url: &str) -> Result<String> {
        let client = self.client()?;
        tracing::info!(url, "fetching page");
        let body = with_retry(self.max_attempts, self.backoff, |_| self.fetch_once(client, url))?;
        tracing::debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::anyhow;
    use reqwest::StatusCode;

    use super::{AttemptError, is_transient_status, with_retry};

    #[test]
    fn retries_transient_failures_until_success() {
        let mut seen = Vec::new();
        let value = with_retry(3, Duration::ZERO, |attempt| {
            seen.push(attempt);
            if attempt < 2 {
                Err(AttemptError::Transient(anyhow!("busy")))
            } else {
                Ok("page")
            }
        })
        .expect("third attempt succeeds");
        assert_eq!(value, "page");
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn permanent_failure_stops_immediately() {
        let mut calls = 0;
        let result: anyhow::Result<()> = with_retry(5, Duration::ZERO, |_| {
            calls += 1;
            Err(AttemptError::Permanent(anyhow!("http 404")))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn exhausted_attempts_report_last_error() {
        let result: anyhow::Result<()> =
            with_retry(2, Duration::ZERO, |_| Err(AttemptError::Transient(anyhow!("timeout"))));
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("giving up after 2 attempts"));
        assert!(msg.contains("timeout"));
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
    }
}
