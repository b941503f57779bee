// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Classification pattern lists

use lazy_static::lazy_static;

use super::ClassificationTag;
use crate::error::{Error, Result};

/// Requests made on behalf of isolated bidding/scoring code
pub const DEFAULT_PRIVATE_PATTERNS: &[&str] = &[
    "resources/trusted-bidding-signals.py",
    "update-url.py",
    "bidding-wasmlogic.wasm",
    "bidding-logic.py",
    "decision-logic.py",
];

/// Requests the page itself is allowed to route through the interceptor
pub const DEFAULT_PUBLIC_PATTERNS: &[&str] = &["direct-from-seller-signals.py"];

lazy_static! {
    static ref DEFAULT_RULE: ClassificationRule = ClassificationRule::new(
        DEFAULT_PRIVATE_PATTERNS.iter().copied(),
        DEFAULT_PUBLIC_PATTERNS.iter().copied(),
    );
}

/// Process-wide default rule
pub fn default_rule() -> &'static ClassificationRule {
    &DEFAULT_RULE
}

/// Ordered substring patterns, one list per classification tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRule {
    private: Vec<String>,
    public: Vec<String>,
}

impl ClassificationRule {
    /// Create a rule from private and public pattern lists
    pub fn new<P, Q>(private: P, public: Q) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        Self {
            private: private.into_iter().map(Into::into).collect(),
            public: public.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a private pattern
    pub fn private(mut self, pattern: impl Into<String>) -> Self {
        self.private.push(pattern.into());
        self
    }

    /// Add a public pattern
    pub fn public(mut self, pattern: impl Into<String>) -> Self {
        self.public.push(pattern.into());
        self
    }

    /// Patterns for a tag, in declaration order
    pub fn patterns(&self, tag: ClassificationTag) -> &[String] {
        match tag {
            ClassificationTag::Private => &self.private,
            ClassificationTag::Public => &self.public,
        }
    }

    /// Total number of patterns
    pub fn len(&self) -> usize {
        self.private.len() + self.public.len()
    }

    /// Check if the rule has no patterns at all
    pub fn is_empty(&self) -> bool {
        self.private.is_empty() && self.public.is_empty()
    }

    /// Reject empty patterns and patterns listed under both tags.
    ///
    /// An empty pattern is contained in every address, so it would classify
    /// all traffic.
    pub fn validate(&self) -> Result<()> {
        for tag in ClassificationTag::ALL {
            if self.patterns(tag).iter().any(|p| p.is_empty()) {
                return Err(Error::config(format!("empty {} pattern", tag)));
            }
        }

        if let Some(shared) = self.private.iter().find(|p| self.public.contains(p)) {
            return Err(Error::config(format!(
                "pattern '{}' is both private and public",
                shared
            )));
        }

        Ok(())
    }
}
