// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Positive confirmation: re-trigger until a `passed` verdict arrives

use std::future::Future;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::Outcome;
use crate::config::PositiveConfig;
use crate::error::{Error, Result};
use crate::notify::{Observation, Topic, TopicSubscription, Verdict};

/// State of a positive verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositiveState {
    Waiting,
    Passed(String),
    Failed(Verdict),
}

impl PositiveState {
    /// Check if no further verdicts will be evaluated
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PositiveState::Waiting)
    }
}

/// Verifier for "an allowed verdict eventually arrives"
pub struct PositiveVerifier {
    subscription: TopicSubscription,
    state: PositiveState,
    config: PositiveConfig,
    triggers_issued: usize,
    observed: Vec<Observation>,
}

impl PositiveVerifier {
    /// Subscribe to `topic` with the given loop bounds
    pub fn new(topic: &Topic, config: PositiveConfig) -> Self {
        Self {
            subscription: topic.subscribe(),
            state: PositiveState::Waiting,
            config,
            triggers_issued: 0,
            observed: Vec::new(),
        }
    }

    pub fn state(&self) -> &PositiveState {
        &self.state
    }

    /// How many times the trigger ran
    pub fn triggers_issued(&self) -> usize {
        self.triggers_issued
    }

    pub fn observed(&self) -> &[Observation] {
        &self.observed
    }

    /// Evaluate one verdict. The first one decides; later ones are ignored.
    pub fn on_verdict(&mut self, observation: Observation) -> &PositiveState {
        if self.state.is_terminal() {
            return &self.state;
        }

        self.state = if observation.verdict.is_passed() {
            info!(topic = %observation.topic, message = %observation.verdict.message, "Confirmed");
            PositiveState::Passed(observation.verdict.message.clone())
        } else {
            warn!(
                topic = %observation.topic,
                message = %observation.verdict.message,
                "Failed verdict on confirmation topic"
            );
            PositiveState::Failed(observation.verdict.clone())
        };
        self.observed.push(observation);

        &self.state
    }

    /// Terminal outcome, if reached
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.state {
            PositiveState::Waiting => None,
            PositiveState::Passed(_) => Some(Outcome::Pass),
            PositiveState::Failed(verdict) => Some(Outcome::from_verdict(verdict)),
        }
    }

    /// Issue `trigger` repeatedly until a verdict arrives or the bound runs
    /// out. The trigger receives the zero-based attempt number and is never
    /// called again once the verifier is terminal. A topic that closes
    /// before any verdict arrived is an `Error::Topic`: nothing could ever
    /// confirm.
    pub async fn confirm<F, Fut>(&mut self, mut trigger: F) -> Result<Outcome>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let started = Instant::now();

        loop {
            self.evaluate_delivered();
            if let Some(outcome) = self.outcome() {
                debug!(attempts = self.triggers_issued, "Confirmation loop stopped");
                return Ok(outcome);
            }
            if self.subscription.is_closed() {
                return Err(Error::Topic(format!(
                    "topic '{}' closed before confirmation",
                    self.subscription.topic()
                )));
            }

            let waited = started.elapsed();
            let exhausted = self
                .config
                .max_attempts
                .map_or(false, |max| self.triggers_issued >= max);
            if exhausted || waited >= self.config.timeout {
                warn!(
                    attempts = self.triggers_issued,
                    waited_ms = waited.as_millis() as u64,
                    "Confirmation bound reached"
                );
                return Ok(Outcome::Timeout {
                    waited,
                    attempts: self.triggers_issued,
                });
            }

            trigger(self.triggers_issued).await?;
            self.triggers_issued += 1;
            tokio::task::yield_now().await;

            let wait = self
                .config
                .poll_interval
                .min(self.config.timeout.saturating_sub(started.elapsed()));
            if let Ok(Some(observation)) =
                tokio::time::timeout(wait, self.subscription.recv()).await
            {
                self.on_verdict(observation);
            }
        }
    }

    fn evaluate_delivered(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        for observation in self.subscription.drain() {
            self.on_verdict(observation);
        }
    }
}
