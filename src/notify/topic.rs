// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Named in-process broadcast topics
//!
//! Every `Topic` opened with the same name on a `TopicBus` joins the same
//! broadcast group. Delivery is best-effort fan-out to the subscribers that
//! exist at publish time: no acknowledgement, no replay, no persistence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::event::{Observation, Verdict};
use crate::error::{Error, Result};

/// Maximum verdicts buffered per subscriber
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Registry of broadcast groups keyed by topic name
#[derive(Clone)]
pub struct TopicBus {
    groups: Arc<DashMap<String, broadcast::Sender<Verdict>>>,
    capacity: usize,
    published: Arc<AtomicU64>,
}

impl Default for TopicBus {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicBus {
    /// Create a bus with default per-subscriber capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-subscriber capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open a topic, joining its group if it already exists
    pub fn topic(&self, name: &str) -> Topic {
        let sender = self
            .groups
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();

        Topic {
            name: name.to_string(),
            sender,
            published: self.published.clone(),
        }
    }

    /// Current subscribers of a topic (0 if never opened)
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.groups
            .get(name)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Names of all opened topics, sorted
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Total verdicts published on this bus
    pub fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Per-subscriber capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Handle onto one named broadcast group
#[derive(Clone)]
pub struct Topic {
    name: String,
    sender: broadcast::Sender<Verdict>,
    published: Arc<AtomicU64>,
}

impl Topic {
    /// Topic name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publish a verdict; returns the number of subscribers reached
    pub fn publish(&self, verdict: Verdict) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(verdict) {
            Ok(receivers) => {
                debug!(topic = %self.name, receivers, "Verdict published");
                receivers
            }
            Err(broadcast::error::SendError(verdict)) => {
                debug!(
                    topic = %self.name,
                    message = %verdict.message,
                    "Verdict dropped (no subscribers)"
                );
                0
            }
        }
    }

    /// Subscribe to verdicts published from now on
    pub fn subscribe(&self) -> TopicSubscription {
        TopicSubscription {
            topic: self.name.clone(),
            receiver: self.sender.subscribe(),
            lagged: 0,
            closed: false,
        }
    }

    /// Current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl std::fmt::Debug for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

/// Receiving side of a topic.
///
/// Verdicts lost to lag are counted rather than hidden: a subscriber that
/// lagged cannot claim it saw everything.
pub struct TopicSubscription {
    topic: String,
    receiver: broadcast::Receiver<Verdict>,
    lagged: u64,
    closed: bool,
}

impl TopicSubscription {
    /// Topic name
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Verdicts dropped because this subscription fell behind
    pub fn lagged(&self) -> u64 {
        self.lagged
    }

    /// Check if every sender is gone and the buffer is exhausted
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn record_lag(&mut self, count: u64) {
        self.lagged += count;
        warn!(topic = %self.topic, lagged = count, "Subscriber lagged, verdicts dropped");
    }

    /// Wait for the next verdict.
    ///
    /// Returns `None` once the group is gone and nothing is buffered.
    pub async fn recv(&mut self) -> Option<Observation> {
        loop {
            match self.receiver.recv().await {
                Ok(verdict) => return Some(Observation::new(self.topic.as_str(), verdict)),
                Err(broadcast::error::RecvError::Closed) => {
                    self.closed = true;
                    return None;
                }
                Err(broadcast::error::RecvError::Lagged(count)) => self.record_lag(count),
            }
        }
    }

    /// Take the next already-delivered verdict without waiting.
    ///
    /// Buffered verdicts are still returned after the group closes.
    pub fn try_recv(&mut self) -> Option<Observation> {
        loop {
            match self.receiver.try_recv() {
                Ok(verdict) => return Some(Observation::new(self.topic.as_str(), verdict)),
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Closed) => {
                    self.closed = true;
                    return None;
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => self.record_lag(count),
            }
        }
    }

    /// Take every already-delivered verdict
    pub fn drain(&mut self) -> Vec<Observation> {
        let mut observed = Vec::new();
        while let Some(observation) = self.try_recv() {
            observed.push(observation);
        }
        observed
    }

    /// Fail if any verdict was lost to lag
    pub fn ensure_complete(&self) -> Result<()> {
        if self.lagged > 0 {
            return Err(Error::Topic(format!(
                "{} verdicts on '{}' lost to lag",
                self.lagged, self.topic
            )));
        }
        Ok(())
    }
}
