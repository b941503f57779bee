// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Verdict event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{ClassificationTag, PatternMatch};
use crate::error::Result;

/// Result carried by a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictResult {
    Passed,
    Failed,
}

/// Verdict published for one classified request.
///
/// Wire shape is exactly `{ "result": "passed" | "failed", "message": string }`.
/// The matched pattern only travels in-process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub result: VerdictResult,
    pub message: String,
    #[serde(skip)]
    pub pattern: Option<String>,
}

impl Verdict {
    /// Create a passed verdict
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            result: VerdictResult::Passed,
            message: message.into(),
            pattern: None,
        }
    }

    /// Create a failed verdict
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: VerdictResult::Failed,
            message: message.into(),
            pattern: None,
        }
    }

    /// Verdict for a pattern match.
    ///
    /// Being seen at all is the violation for private requests.
    pub fn for_match(found: &PatternMatch<'_>) -> Self {
        let verdict = match found.tag {
            ClassificationTag::Private => {
                Self::failed(format!("interceptor should not have seen: {}", found.pattern))
            }
            ClassificationTag::Public => {
                Self::passed(format!("interceptor properly saw: {}", found.pattern))
            }
        };
        verdict.with_pattern(found.pattern)
    }

    /// Attach the pattern that produced this verdict
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Check if passed
    pub fn is_passed(&self) -> bool {
        self.result == VerdictResult::Passed
    }

    /// Check if failed
    pub fn is_failed(&self) -> bool {
        self.result == VerdictResult::Failed
    }

    /// Encode to the wire payload
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a wire payload
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self.result {
            VerdictResult::Passed => "passed",
            VerdictResult::Failed => "failed",
        };
        write!(f, "[{}] {}", result, self.message)
    }
}

/// A verdict as received by a subscriber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Topic the verdict arrived on
    pub topic: String,
    /// The verdict
    pub verdict: Verdict,
    /// Receive time
    pub received_at: DateTime<Utc>,
}

impl Observation {
    /// Stamp a verdict received on a topic
    pub fn new(topic: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            topic: topic.into(),
            verdict,
            received_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let verdict = Verdict::failed("interceptor should not have seen: secret.py");
        let value: serde_json::Value = serde_json::from_str(&verdict.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "result": "failed",
                "message": "interceptor should not have seen: secret.py"
            })
        );
    }

    #[test]
    fn test_decode_foreign_payload() {
        let verdict =
            Verdict::from_json(r#"{"result":"passed","message":"seen: public.py"}"#).unwrap();
        assert!(verdict.is_passed());
        assert_eq!(verdict.message, "seen: public.py");

        assert!(Verdict::from_json(r#"{"result":"maybe","message":""}"#).is_err());
    }

    #[test]
    fn test_verdict_for_match() {
        let private = Verdict::for_match(&PatternMatch {
            tag: ClassificationTag::Private,
            pattern: "secret.py",
        });
        assert!(private.is_failed());
        assert!(private.message.contains("secret.py"));
        assert_eq!(private.pattern.as_deref(), Some("secret.py"));

        // The pattern stays off the wire
        let value: serde_json::Value =
            serde_json::from_str(&private.to_json().unwrap()).unwrap();
        assert!(value.get("pattern").is_none());
        assert_eq!(Verdict::from_json(&private.to_json().unwrap()).unwrap().pattern, None);

        let public = Verdict::for_match(&PatternMatch {
            tag: ClassificationTag::Public,
            pattern: "public.py",
        });
        assert!(public.is_passed());
        assert_eq!(public.to_string(), "[passed] interceptor properly saw: public.py");
    }
}
