// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Liveness check
//!
//! A negative verdict alone cannot tell "the interceptor correctly saw
//! nothing" from "nothing happened". The liveness check confirms the
//! expected side-effect requests were really made.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::LivenessConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::network::RequestLog;

/// Source of addresses that were observed leaving the system under test
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn observed(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl LivenessProbe for RequestLog {
    async fn observed(&self) -> Result<Vec<String>> {
        Ok(self.delivered_urls())
    }
}

/// Delivered requests of a [`RequestLog`] containing a marker, usually a per-run uuid
pub struct TrackedRequests {
    log: RequestLog,
    marker: String,
}

impl TrackedRequests {
    pub fn new(log: RequestLog, marker: impl Into<String>) -> Self {
        Self {
            log,
            marker: marker.into(),
        }
    }
}

#[async_trait]
impl LivenessProbe for TrackedRequests {
    async fn observed(&self) -> Result<Vec<String>> {
        Ok(self
            .log
            .delivered_urls()
            .into_iter()
            .filter(|url| url.contains(&self.marker))
            .collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StashPayload {
    Tracked {
        #[serde(rename = "trackedRequests")]
        tracked_requests: Vec<String>,
        #[serde(default)]
        errors: Vec<String>,
    },
    Plain(Vec<String>),
}

/// Request stash served over HTTP
///
/// Accepts either a bare JSON array of addresses or
/// `{"trackedRequests": [...], "errors": [...]}`. Errors reported by the
/// stash fail the probe.
pub struct HttpRequestLog {
    client: HttpClient,
    url: Url,
}

impl HttpRequestLog {
    pub fn new(client: HttpClient, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            client,
            url: Url::parse(url.as_ref())?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl LivenessProbe for HttpRequestLog {
    async fn observed(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.url.as_str()).await?;
        if !response.is_success() {
            return Err(Error::network(format!(
                "request stash {} returned {}",
                self.url,
                response.status_code()
            )));
        }

        match response.json::<StashPayload>()? {
            StashPayload::Plain(requests) => Ok(requests),
            StashPayload::Tracked {
                tracked_requests,
                errors,
            } => {
                if errors.is_empty() {
                    Ok(tracked_requests)
                } else {
                    Err(Error::network(errors.join(", ")))
                }
            }
        }
    }
}

/// Poll `probe` until at least `expected.len()` addresses were observed,
/// then require the sorted lists to be equal.
pub async fn wait_for_observed_requests<P>(
    probe: &P,
    expected: &[String],
    config: &LivenessConfig,
) -> Result<()>
where
    P: LivenessProbe + ?Sized,
{
    let started = Instant::now();
    let mut polls = 0usize;

    let mut expected: Vec<String> = expected.to_vec();
    expected.sort();

    loop {
        let mut observed = probe.observed().await?;
        polls += 1;

        if observed.len() >= expected.len() {
            observed.sort();
            if observed == expected {
                debug!(requests = observed.len(), polls, "Liveness confirmed");
                return Ok(());
            }

            let missing: Vec<String> = expected
                .iter()
                .filter(|url| !observed.contains(url))
                .cloned()
                .collect();
            let unexpected: Vec<String> = observed
                .iter()
                .filter(|url| !expected.contains(url))
                .cloned()
                .collect();
            warn!(?missing, ?unexpected, "Liveness mismatch");
            return Err(Error::LivenessUnconfirmed {
                missing,
                unexpected,
            });
        }

        let waited = started.elapsed();
        if waited >= config.timeout {
            return Err(Error::timeout_after_attempts(
                "liveness check",
                waited.as_millis() as u64,
                polls,
            ));
        }

        debug!(
            observed = observed.len(),
            expected = expected.len(),
            "Waiting for observed requests"
        );
        tokio::time::sleep(config.poll_interval).await;
    }
}
