// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request classification
//!
//! Assigns request addresses to the `private` or `public` class using
//! substring pattern lists:
//! - private requests must never be seen by the interception layer
//! - public requests must be seen by it
//! - anything else is ignored

mod classifier;
mod rules;

pub use classifier::{Classifier, PatternMatch};
pub use rules::{default_rule, ClassificationRule, DEFAULT_PRIVATE_PATTERNS, DEFAULT_PUBLIC_PATTERNS};

use serde::{Deserialize, Serialize};

/// Classification tag of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationTag {
    /// Must stay invisible to the interceptor
    Private,
    /// Must be visible to the interceptor
    Public,
}

impl ClassificationTag {
    /// All tags, in priority order
    pub const ALL: [ClassificationTag; 2] = [ClassificationTag::Private, ClassificationTag::Public];

    /// Lowercase tag name used in topic names
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationTag::Private => "private",
            ClassificationTag::Public => "public",
        }
    }
}

impl std::fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
