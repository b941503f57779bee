// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request log of a request path

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::http::Initiator;

/// One dispatched request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub initiator: Initiator,
    /// Whether the request was shown to an installed interceptor
    pub intercepted: bool,
    /// Whether the transport sent it (false for aborted, mocked or failed requests)
    pub delivered: bool,
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.error) {
            (Some(status), _) => write!(f, "{} {} -> {}", self.method, self.url, status),
            (None, Some(err)) => write!(f, "{} {} -> ERROR: {}", self.method, self.url, err),
            _ => write!(f, "{} {} -> pending", self.method, self.url),
        }
    }
}

/// Append-only log shared by clones
#[derive(Clone)]
pub struct RequestLog {
    entries: Arc<RwLock<Vec<LogEntry>>>,
    max_entries: usize,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::with_max_entries(10_000)
    }

    /// Create an empty log keeping at most `max` entries
    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            max_entries: max.max(1),
        }
    }

    /// Record an entry, evicting the oldest one when full
    pub fn record(&self, entry: LogEntry) {
        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries {
            entries.remove(0);
        }
        entries.push(entry);
    }

    /// All entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// URLs the transport actually sent
    pub fn delivered_urls(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.delivered)
            .map(|e| e.url.clone())
            .collect()
    }

    /// URLs the installed interceptor was shown
    pub fn intercepted_urls(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.intercepted)
            .map(|e| e.url.clone())
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
