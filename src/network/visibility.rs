// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Visibility probe interceptor
//!
//! Installed in the request path in place of a real proxy. It never alters
//! traffic: it reports every request it is shown through the notifier, so a
//! verifier can tell which requests reached the interception layer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::interceptor_trait::{InterceptAction, RequestInterceptor};
use crate::error::Result;
use crate::http::Request;
use crate::notify::Notifier;

/// Name the probe registers under
pub const VISIBILITY_INTERCEPTOR_NAME: &str = "visibility-interceptor";

/// Counters kept by the probe
#[derive(Debug, Default)]
pub struct InterceptorStats {
    requests_seen: AtomicU64,
    private_verdicts: AtomicU64,
    public_verdicts: AtomicU64,
}

/// Point-in-time copy of `InterceptorStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests_seen: u64,
    pub private_verdicts: u64,
    pub public_verdicts: u64,
}

impl InterceptorStats {
    /// Requests shown to the probe
    pub fn requests_seen(&self) -> u64 {
        self.requests_seen.load(Ordering::Relaxed)
    }

    /// Failed verdicts published
    pub fn private_verdicts(&self) -> u64 {
        self.private_verdicts.load(Ordering::Relaxed)
    }

    /// Passed verdicts published
    pub fn public_verdicts(&self) -> u64 {
        self.public_verdicts.load(Ordering::Relaxed)
    }

    /// Copy all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_seen: self.requests_seen(),
            private_verdicts: self.private_verdicts(),
            public_verdicts: self.public_verdicts(),
        }
    }
}

/// Interceptor that classifies and reports every request it sees
pub struct VisibilityInterceptor {
    notifier: Notifier,
    stats: Arc<InterceptorStats>,
}

impl VisibilityInterceptor {
    /// Create a probe publishing through `notifier`
    pub fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            stats: Arc::new(InterceptorStats::default()),
        }
    }

    /// Shared handle to the counters, usable after the probe is installed
    pub fn stats(&self) -> Arc<InterceptorStats> {
        self.stats.clone()
    }

    /// Get the notifier
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[async_trait]
impl RequestInterceptor for VisibilityInterceptor {
    fn name(&self) -> &str {
        VISIBILITY_INTERCEPTOR_NAME
    }

    async fn setup(&self) -> Result<()> {
        self.notifier.classifier().rule().validate()
    }

    async fn before_request(&self, request: &mut Request) -> InterceptAction {
        self.stats.requests_seen.fetch_add(1, Ordering::Relaxed);

        let published = self.notifier.notify_address(request.url.as_str());
        self.stats
            .private_verdicts
            .fetch_add(published.private as u64, Ordering::Relaxed);
        self.stats
            .public_verdicts
            .fetch_add(published.public as u64, Ordering::Relaxed);

        InterceptAction::Continue
    }

    fn priority(&self) -> i32 {
        1000 // Observe before anything can abort or mock the request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassificationRule, ClassificationTag, Classifier};
    use crate::notify::TopicBus;

    fn probe() -> VisibilityInterceptor {
        VisibilityInterceptor::new(Notifier::new(
            Classifier::new(ClassificationRule::new(["secret.py"], ["public.py"])),
            TopicBus::new(),
        ))
    }

    #[tokio::test]
    async fn test_probe_reports_and_continues() {
        let probe = probe();
        let mut private = probe.notifier().topic(ClassificationTag::Private).subscribe();

        let mut request = Request::get("https://x/secret.py?id=1").unwrap();
        assert!(matches!(
            probe.before_request(&mut request).await,
            InterceptAction::Continue
        ));

        let mut other = Request::get("https://x/index.html").unwrap();
        probe.before_request(&mut other).await;

        assert_eq!(
            probe.stats().snapshot(),
            StatsSnapshot {
                requests_seen: 2,
                private_verdicts: 1,
                public_verdicts: 0,
            }
        );
        assert_eq!(private.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_setup_validates_rule() {
        assert!(probe().setup().await.is_ok());

        let broken = VisibilityInterceptor::new(Notifier::new(
            Classifier::new(ClassificationRule::new(["x.py"], ["x.py"])),
            TopicBus::new(),
        ));
        assert!(broken.setup().await.is_err());
    }
}
