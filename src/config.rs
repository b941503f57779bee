// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Audit configuration

use std::time::Duration;

use crate::notify::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_TOPIC_SUFFIX};

/// Top-level audit configuration
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Suffix appended to the tag to form topic names
    pub topic_suffix: String,
    /// Verdicts buffered per subscriber
    pub channel_capacity: usize,
    /// How long to wait for the interceptor to become active
    pub ready_timeout: Duration,
    /// Positive confirmation loop bounds
    pub positive: PositiveConfig,
    /// Liveness polling bounds
    pub liveness: LivenessConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            topic_suffix: DEFAULT_TOPIC_SUFFIX.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            ready_timeout: Duration::from_secs(10),
            positive: PositiveConfig::default(),
            liveness: LivenessConfig::default(),
        }
    }
}

impl AuditConfig {
    /// Create a new audit config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set topic suffix
    pub fn topic_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.topic_suffix = suffix.into();
        self
    }

    /// Set channel capacity
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Set ready timeout
    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Set positive confirmation config
    pub fn positive(mut self, positive: PositiveConfig) -> Self {
        self.positive = positive;
        self
    }

    /// Set liveness config
    pub fn liveness(mut self, liveness: LivenessConfig) -> Self {
        self.liveness = liveness;
        self
    }

    /// Short bounds for in-process tests
    pub fn for_local_testing() -> Self {
        Self {
            ready_timeout: Duration::from_secs(1),
            positive: PositiveConfig {
                max_attempts: Some(50),
                timeout: Duration::from_secs(2),
                poll_interval: Duration::from_millis(10),
            },
            liveness: LivenessConfig {
                poll_interval: Duration::from_millis(10),
                timeout: Duration::from_secs(2),
            },
            ..Default::default()
        }
    }

    /// Long bounds for slow test infrastructure
    pub fn for_slow_environments() -> Self {
        Self {
            ready_timeout: Duration::from_secs(60),
            positive: PositiveConfig {
                max_attempts: None,
                timeout: Duration::from_secs(180),
                poll_interval: Duration::from_millis(250),
            },
            liveness: LivenessConfig {
                poll_interval: Duration::from_millis(500),
                timeout: Duration::from_secs(60),
            },
            ..Default::default()
        }
    }
}

/// Bounds for the positive confirmation loop
#[derive(Debug, Clone)]
pub struct PositiveConfig {
    /// Maximum triggers to issue (None = limited by timeout only)
    pub max_attempts: Option<usize>,
    /// Overall time budget
    pub timeout: Duration,
    /// How long to wait for a verdict after each trigger
    pub poll_interval: Duration,
}

impl Default for PositiveConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl PositiveConfig {
    /// Create a new positive config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max attempts
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Bounds for liveness polling
#[derive(Debug, Clone)]
pub struct LivenessConfig {
    /// Delay between probe reads
    pub poll_interval: Duration,
    /// Overall time budget
    pub timeout: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(10),
        }
    }
}
