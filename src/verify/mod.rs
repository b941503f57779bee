// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Verification protocols
//!
//! Turns asynchronous verdicts into a terminal outcome:
//! - negative confirmation: no `failed` verdict during an action
//! - positive confirmation: a `passed` verdict eventually arrives
//! - liveness: expected side-effect requests really happened
//! - audit: negative confirmation guarded against vacuous passes

mod audit;
mod liveness;
mod negative;
mod positive;

pub use audit::{AuditReport, AuditVerdict, Liveness, VisibilityAudit};
pub use liveness::{wait_for_observed_requests, HttpRequestLog, LivenessProbe, TrackedRequests};
pub use negative::{NegativeState, NegativeVerifier};
pub use positive::{PositiveState, PositiveVerifier};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notify::Verdict;

/// Terminal state of a verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The property held
    Pass,
    /// The property was violated by the verdict carrying `message`
    Fail {
        message: String,
        pattern: Option<String>,
    },
    /// The loop bound ran out before a verdict arrived
    Timeout { waited: Duration, attempts: usize },
}

impl Outcome {
    /// Failure without a known pattern
    pub fn fail(message: impl Into<String>) -> Self {
        Outcome::Fail {
            message: message.into(),
            pattern: None,
        }
    }

    /// Failure caused by `verdict`
    pub fn from_verdict(verdict: &Verdict) -> Self {
        Outcome::Fail {
            message: verdict.message.clone(),
            pattern: verdict.pattern.clone(),
        }
    }

    /// Check if passed
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// Check if failed
    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail { .. })
    }

    /// Check if timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Outcome::Timeout { .. })
    }

    /// Failure reason, if failed
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Fail { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Convert into a result, surfacing the reason verbatim
    pub fn into_result(self) -> Result<()> {
        match self {
            Outcome::Pass => Ok(()),
            Outcome::Fail {
                message,
                pattern: Some(pattern),
            } => Err(Error::violation_for(pattern, message)),
            Outcome::Fail {
                message,
                pattern: None,
            } => Err(Error::violation(message)),
            Outcome::Timeout { waited, attempts } => Err(Error::timeout_after_attempts(
                "positive confirmation",
                waited.as_millis() as u64,
                attempts,
            )),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail { message, .. } => write!(f, "fail: {}", message),
            Outcome::Timeout { waited, attempts } => write!(
                f,
                "timeout after {}ms ({} attempts)",
                waited.as_millis(),
                attempts
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_into_result() {
        assert!(Outcome::Pass.into_result().is_ok());

        let verdict = Verdict::failed("interceptor should not have seen: secret.py")
            .with_pattern("secret.py");
        let err = Outcome::from_verdict(&verdict).into_result().unwrap_err();
        assert!(err.is_violation());
        assert_eq!(err.pattern(), Some("secret.py"));
        assert!(err.to_string().ends_with("interceptor should not have seen: secret.py"));

        let err = Outcome::fail("lost").into_result().unwrap_err();
        assert_eq!(err.pattern(), None);

        let err = Outcome::Timeout {
            waited: Duration::from_millis(1500),
            attempts: 30,
        }
        .into_result()
        .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Pass.to_string(), "pass");
        assert_eq!(Outcome::fail("x").reason(), Some("x"));
    }
}
