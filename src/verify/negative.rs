// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Negative confirmation: no `failed` verdict during an action
//!
//! The stream itself never signals success. The pass condition is the
//! absence of a `failed` verdict for exactly the lifetime of the action under
//! test, so the observation window opens when the verifier subscribes and
//! closes when the action resolves. Absence can only be claimed if every
//! verdict published in the window was received.

use std::future::Future;

use tracing::{debug, warn};

use super::Outcome;
use crate::error::{Error, Result};
use crate::notify::{Observation, Topic, TopicSubscription, Verdict};

/// State of a negative verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegativeState {
    /// Window open, nothing disallowed seen yet
    Observing,
    /// A `failed` verdict arrived
    Failed(Verdict),
    /// Window closed cleanly
    Done,
}

/// Verifier for "no disallowed verdict ever arrives"
pub struct NegativeVerifier {
    subscription: TopicSubscription,
    state: NegativeState,
    observed: Vec<Observation>,
}

impl NegativeVerifier {
    /// Subscribe to `topic`; the window opens now
    pub fn new(topic: &Topic) -> Self {
        Self {
            subscription: topic.subscribe(),
            state: NegativeState::Observing,
            observed: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &NegativeState {
        &self.state
    }

    /// Verdicts evaluated while the window was open
    pub fn observed(&self) -> &[Observation] {
        &self.observed
    }

    /// Evaluate one verdict. Ignored once the verifier is terminal.
    pub fn on_verdict(&mut self, observation: Observation) -> &NegativeState {
        if self.state != NegativeState::Observing {
            debug!(topic = %observation.topic, "Verdict after window closed, not evaluated");
            return &self.state;
        }

        if observation.verdict.is_failed() {
            warn!(
                topic = %observation.topic,
                message = %observation.verdict.message,
                "Disallowed verdict observed"
            );
            self.state = NegativeState::Failed(observation.verdict.clone());
        }
        self.observed.push(observation);

        &self.state
    }

    /// Close the window. A verifier still observing becomes `Done`.
    pub fn close(&mut self) -> Outcome {
        if self.state == NegativeState::Observing {
            self.state = NegativeState::Done;
        }
        self.outcome().unwrap_or(Outcome::Pass)
    }

    /// Terminal outcome, if reached
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.state {
            NegativeState::Observing => None,
            NegativeState::Failed(verdict) => Some(Outcome::from_verdict(verdict)),
            NegativeState::Done => Some(Outcome::Pass),
        }
    }

    /// Run `action` with the window open for exactly its lifetime.
    ///
    /// Returns `Fail` for the first offending verdict as soon as it arrives,
    /// abandoning the action. When the action resolves, verdicts already
    /// delivered are evaluated and the window closes. An action error is
    /// returned unchanged unless a violation was seen first. If verdicts were
    /// lost to lag and no violation was seen, the window cannot pass and an
    /// `Error::Topic` is returned instead.
    pub async fn observe<F, T>(&mut self, action: F) -> Result<Outcome>
    where
        F: Future<Output = Result<T>>,
    {
        if self.state != NegativeState::Observing {
            return Err(Error::other("observation window already closed"));
        }

        tokio::pin!(action);

        loop {
            tokio::select! {
                biased;

                received = self.subscription.recv(), if !self.subscription.is_closed() => {
                    if let Some(observation) = received {
                        if let NegativeState::Failed(verdict) = self.on_verdict(observation) {
                            return Ok(Outcome::from_verdict(verdict));
                        }
                    }
                    self.subscription.ensure_complete()?;
                }
                result = &mut action => {
                    self.evaluate_delivered();
                    if let Some(outcome) = self.outcome() {
                        return Ok(outcome);
                    }
                    self.subscription.ensure_complete()?;
                    result?;
                    let outcome = self.close();
                    debug!(observed = self.observed.len(), "Observation window closed");
                    return Ok(outcome);
                }
            }
        }
    }

    fn evaluate_delivered(&mut self) {
        for observation in self.subscription.drain() {
            self.on_verdict(observation);
        }
    }
}
