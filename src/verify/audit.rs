// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request visibility audit
//!
//! Wires the probe into a hook and runs both confirmation protocols against
//! it. A private run only passes when no disallowed verdict arrived, the
//! expected side effects were observed, and the probe actually saw traffic.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::liveness::{wait_for_observed_requests, LivenessProbe};
use super::negative::NegativeVerifier;
use super::positive::PositiveVerifier;
use super::Outcome;
use crate::classify::{ClassificationTag, Classifier};
use crate::config::AuditConfig;
use crate::error::{Error, ErrorContext, Result};
use crate::network::{
    InterceptionHook, InterceptorStats, Registration, VisibilityInterceptor, INSTALL_CONTEXT,
    VISIBILITY_INTERCEPTOR_NAME,
};
use crate::notify::{Notifier, Observation, TopicBus};

/// Result of the liveness check in a private run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    Confirmed,
    Unconfirmed {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    TimedOut,
    /// Not run because the negative check already failed
    Skipped,
}

/// Overall verdict of a private run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditVerdict {
    Pass,
    Violation(String),
    LivenessUnconfirmed,
    InterceptorInactive,
}

impl AuditVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, AuditVerdict::Pass)
    }
}

/// Report of a private run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub outcome: Outcome,
    pub liveness: Liveness,
    /// Requests the probe was shown during the run
    pub requests_intercepted: u64,
    pub observed: Vec<Observation>,
}

impl AuditReport {
    /// Combine the three checks
    pub fn verdict(&self) -> AuditVerdict {
        match &self.outcome {
            Outcome::Fail { message, .. } => return AuditVerdict::Violation(message.clone()),
            Outcome::Timeout { .. } => return AuditVerdict::LivenessUnconfirmed,
            Outcome::Pass => {}
        }

        if self.liveness != Liveness::Confirmed {
            return AuditVerdict::LivenessUnconfirmed;
        }
        if self.requests_intercepted == 0 {
            return AuditVerdict::InterceptorInactive;
        }
        AuditVerdict::Pass
    }

    /// Convert into a result; anything but `Pass` is an error
    pub fn into_result(self) -> Result<()> {
        match self.verdict() {
            AuditVerdict::Pass => Ok(()),
            AuditVerdict::Violation(_) => self.outcome.into_result(),
            AuditVerdict::LivenessUnconfirmed => match self.liveness {
                Liveness::Unconfirmed {
                    missing,
                    unexpected,
                } => Err(Error::LivenessUnconfirmed {
                    missing,
                    unexpected,
                }),
                _ => Err(Error::other("expected requests were not observed")),
            },
            AuditVerdict::InterceptorInactive => Err(Error::other(
                "interceptor handled no requests; a passing run would be vacuous",
            )),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Probe installed in a hook, ready to run audits
pub struct VisibilityAudit {
    notifier: Notifier,
    hook: InterceptionHook,
    config: AuditConfig,
    stats: Arc<InterceptorStats>,
}

impl VisibilityAudit {
    /// Build a notifier from `config` and install the probe into `hook`
    pub async fn install(
        hook: InterceptionHook,
        classifier: Classifier,
        config: AuditConfig,
    ) -> Result<Self> {
        let notifier = Notifier::new(classifier, TopicBus::with_capacity(config.channel_capacity))
            .topic_suffix(config.topic_suffix.clone());
        Self::install_with(hook, notifier, config).await
    }

    /// Install a probe publishing through `notifier`.
    ///
    /// Setup errors and a hook that never becomes ready are both
    /// `Error::SetupFailure`.
    pub async fn install_with(
        hook: InterceptionHook,
        notifier: Notifier,
        config: AuditConfig,
    ) -> Result<Self> {
        let probe = VisibilityInterceptor::new(notifier.clone());
        let stats = probe.stats();

        hook.install(probe).await?;
        hook.ready_timeout(config.ready_timeout)
            .await
            .setup_context(INSTALL_CONTEXT)?;

        Ok(Self {
            notifier,
            hook,
            config,
            stats,
        })
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn hook(&self) -> &InterceptionHook {
        &self.hook
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn stats(&self) -> Arc<InterceptorStats> {
        self.stats.clone()
    }

    /// Run `action` and require that no private request reached the probe,
    /// then confirm `expected` through `probe`.
    pub async fn run_private<F, T, P>(
        &self,
        action: F,
        probe: &P,
        expected: &[String],
    ) -> Result<AuditReport>
    where
        F: Future<Output = Result<T>>,
        P: LivenessProbe + ?Sized,
    {
        if !self.hook.is_controlled_by(VISIBILITY_INTERCEPTOR_NAME) {
            warn!("Probe is not the active interceptor; run will likely be vacuous");
        }

        let seen_before = self.stats.requests_seen();
        let mut verifier =
            NegativeVerifier::new(&self.notifier.topic(ClassificationTag::Private));
        let outcome = verifier.observe(action).await?;

        let liveness = if outcome.is_pass() {
            match wait_for_observed_requests(probe, expected, &self.config.liveness).await {
                Ok(()) => Liveness::Confirmed,
                Err(Error::LivenessUnconfirmed {
                    missing,
                    unexpected,
                }) => Liveness::Unconfirmed {
                    missing,
                    unexpected,
                },
                Err(Error::Timeout { .. }) => Liveness::TimedOut,
                Err(err) => return Err(err),
            }
        } else {
            Liveness::Skipped
        };

        let report = AuditReport {
            outcome,
            liveness,
            requests_intercepted: self.stats.requests_seen().saturating_sub(seen_before),
            observed: verifier.observed().to_vec(),
        };
        info!(
            verdict = ?report.verdict(),
            requests_intercepted = report.requests_intercepted,
            "Private run finished"
        );

        Ok(report)
    }

    /// Re-issue `trigger` until the probe reports a public request
    pub async fn run_public<F, Fut>(&self, trigger: F) -> Result<Outcome>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut verifier = PositiveVerifier::new(
            &self.notifier.topic(ClassificationTag::Public),
            self.config.positive.clone(),
        );
        let outcome = verifier.confirm(trigger).await?;
        info!(
            %outcome,
            attempts = verifier.triggers_issued(),
            "Public run finished"
        );

        Ok(outcome)
    }

    /// Remove the probe from the hook
    pub fn finish(self) -> Option<Arc<Registration>> {
        self.hook.teardown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassificationRule;
    use crate::http::{Request, Response};
    use crate::network::{RequestPath, Transport};
    use crate::verify::TrackedRequests;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    struct Echo;

    #[async_trait]
    impl Transport for Echo {
        async fn execute(&self, request: Request) -> Result<Response> {
            Ok(Response::empty(StatusCode::OK, request.url))
        }
    }

    const UUID: &str = "uuid=7f3c";

    fn url(path: &str) -> String {
        format!("https://fledge.test/{}?{}", path, UUID)
    }

    async fn audit(hook: &InterceptionHook) -> VisibilityAudit {
        VisibilityAudit::install(
            hook.clone(),
            Classifier::default(),
            AuditConfig::for_local_testing(),
        )
        .await
        .unwrap()
    }

    /// Auction page: page fetches are interceptable, worklet fetches isolated
    async fn run_auction(path: &RequestPath, leak: bool) -> Result<()> {
        path.get(url("auction.html")).await?;
        path.get_isolated(url("resources/bidding-logic.py")).await?;
        path.get_isolated(url("resources/decision-logic.py")).await?;
        if leak {
            path.get(url("resources/trusted-bidding-signals.py")).await?;
        }
        path.get_isolated(url("report-bidder")).await?;
        Ok(())
    }

    fn expected() -> Vec<String> {
        vec![
            url("auction.html"),
            url("resources/bidding-logic.py"),
            url("resources/decision-logic.py"),
            url("report-bidder"),
        ]
    }

    #[tokio::test]
    async fn test_private_run_passes() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        let path = RequestPath::new(hook, Echo);
        let stash = TrackedRequests::new(path.log().clone(), UUID);

        let report = audit
            .run_private(run_auction(&path, false), &stash, &expected())
            .await
            .unwrap();

        assert_eq!(report.verdict(), AuditVerdict::Pass);
        assert_eq!(report.liveness, Liveness::Confirmed);
        assert_eq!(report.requests_intercepted, 1);
        assert!(report.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_private_leak_is_violation() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        let path = RequestPath::new(hook, Echo);
        let stash = TrackedRequests::new(path.log().clone(), UUID);

        let report = audit
            .run_private(run_auction(&path, true), &stash, &expected())
            .await
            .unwrap();

        assert_eq!(
            report.verdict(),
            AuditVerdict::Violation(
                "interceptor should not have seen: resources/trusted-bidding-signals.py"
                    .to_string()
            )
        );
        assert_eq!(report.liveness, Liveness::Skipped);
        let err = report.into_result().unwrap_err();
        assert!(err.is_violation());
        assert_eq!(err.pattern(), Some("resources/trusted-bidding-signals.py"));
    }

    #[tokio::test]
    async fn test_inactive_interceptor_is_not_a_pass() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        hook.teardown();
        let path = RequestPath::new(hook, Echo);
        let stash = TrackedRequests::new(path.log().clone(), UUID);

        let report = audit
            .run_private(run_auction(&path, true), &stash, &expected())
            .await
            .unwrap();

        // The leak goes unseen because nothing was listening
        assert!(report.outcome.is_pass());
        assert_eq!(report.verdict(), AuditVerdict::LivenessUnconfirmed);
    }

    #[tokio::test]
    async fn test_inactive_interceptor_with_liveness() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        hook.teardown();
        let path = RequestPath::new(hook, Echo);
        let stash = TrackedRequests::new(path.log().clone(), UUID);

        let report = audit
            .run_private(run_auction(&path, false), &stash, &expected())
            .await
            .unwrap();

        assert_eq!(report.liveness, Liveness::Confirmed);
        assert_eq!(report.requests_intercepted, 0);
        assert_eq!(report.verdict(), AuditVerdict::InterceptorInactive);
    }

    #[tokio::test]
    async fn test_missing_side_effect() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        let path = RequestPath::new(hook, Echo);
        let stash = TrackedRequests::new(path.log().clone(), UUID);

        let mut expected = expected();
        expected.pop();
        expected.push(url("report-seller"));

        let report = audit
            .run_private(run_auction(&path, false), &stash, &expected)
            .await
            .unwrap();

        assert_eq!(
            report.liveness,
            Liveness::Unconfirmed {
                missing: vec![url("report-seller")],
                unexpected: vec![url("report-bidder")],
            }
        );
        assert_eq!(report.verdict(), AuditVerdict::LivenessUnconfirmed);
    }

    #[tokio::test]
    async fn test_public_run_confirms() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        let path = RequestPath::new(hook, Echo);

        let outcome = audit
            .run_public(|_| {
                let path = path.clone();
                async move {
                    path.get(url("resources/direct-from-seller-signals.py")).await?;
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Pass);
    }

    #[tokio::test]
    async fn test_public_run_without_probe_times_out() {
        let hook = InterceptionHook::new();
        let audit = audit(&hook).await;
        assert!(audit.hook().teardown().is_some());
        let path = RequestPath::new(hook, Echo);

        let outcome = audit
            .run_public(|_| {
                let path = path.clone();
                async move {
                    path.get(url("resources/direct-from-seller-signals.py")).await?;
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Timeout { attempts: 50, .. }));
    }

    #[tokio::test]
    async fn test_install_rejects_invalid_rule() {
        let rule = ClassificationRule::new(["secret.py"], ["secret.py"]);
        let err = VisibilityAudit::install(
            InterceptionHook::new(),
            Classifier::new(rule),
            AuditConfig::for_local_testing(),
        )
        .await
        .err()
        .unwrap();

        assert!(err.is_setup_failure());
    }

    #[tokio::test]
    async fn test_report_json() {
        let report = AuditReport {
            outcome: Outcome::Pass,
            liveness: Liveness::Confirmed,
            requests_intercepted: 3,
            observed: Vec::new(),
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"requests_intercepted\": 3"));
        assert!(json.contains("confirmed"));
    }
}
