// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Address classifier

use super::rules::{default_rule, ClassificationRule};
use super::ClassificationTag;

/// One pattern that an address contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub tag: ClassificationTag,
    pub pattern: &'a str,
}

/// Classifies request addresses by raw substring containment.
///
/// No normalization is applied: matching is case sensitive and query
/// strings are part of the address.
#[derive(Debug, Clone)]
pub struct Classifier {
    rule: ClassificationRule,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rule().clone())
    }
}

impl Classifier {
    /// Create a classifier over a rule
    pub fn new(rule: ClassificationRule) -> Self {
        Self { rule }
    }

    /// Get the rule
    pub fn rule(&self) -> &ClassificationRule {
        &self.rule
    }

    /// Highest priority class of an address: private, then public
    pub fn classify(&self, address: &str) -> Option<ClassificationTag> {
        ClassificationTag::ALL
            .into_iter()
            .find(|tag| self.contains_any(*tag, address))
    }

    /// Every matching pattern of both lists.
    ///
    /// Private matches come first, each list in rule order. An address that
    /// matches several patterns yields one entry per pattern.
    pub fn matches<'a>(&'a self, address: &str) -> Vec<PatternMatch<'a>> {
        ClassificationTag::ALL
            .into_iter()
            .flat_map(move |tag| {
                self.rule
                    .patterns(tag)
                    .iter()
                    .filter(move |p| address.contains(p.as_str()))
                    .map(move |p| PatternMatch {
                        tag,
                        pattern: p.as_str(),
                    })
            })
            .collect()
    }

    /// Matching patterns of a single tag
    pub fn matches_for<'a>(&'a self, tag: ClassificationTag, address: &str) -> Vec<&'a str> {
        self.rule
            .patterns(tag)
            .iter()
            .filter(|p| address.contains(p.as_str()))
            .map(String::as_str)
            .collect()
    }

    fn contains_any(&self, tag: ClassificationTag, address: &str) -> bool {
        self.rule
            .patterns(tag)
            .iter()
            .any(|p| address.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(ClassificationRule::new(["secret.py"], ["public.py"]))
    }

    #[test]
    fn test_private_address() {
        let c = classifier();
        let address = "https://x/secret.py?id=1";

        assert_eq!(c.classify(address), Some(ClassificationTag::Private));
        assert_eq!(
            c.matches(address),
            vec![PatternMatch {
                tag: ClassificationTag::Private,
                pattern: "secret.py"
            }]
        );
    }

    #[test]
    fn test_public_address() {
        let c = classifier();
        assert_eq!(c.classify("https://x/public.py"), Some(ClassificationTag::Public));
        assert_eq!(c.matches("https://x/public.py").len(), 1);
    }

    #[test]
    fn test_unclassified_address() {
        let c = classifier();
        assert_eq!(c.classify("https://x/index.html"), None);
        assert!(c.matches("https://x/index.html").is_empty());
    }

    #[test]
    fn test_private_takes_priority() {
        let c = classifier();
        let address = "https://x/public.py?next=secret.py";

        assert_eq!(c.classify(address), Some(ClassificationTag::Private));

        // Both sets still fan out
        let matches = c.matches(address);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].tag, ClassificationTag::Private);
        assert_eq!(matches[1].tag, ClassificationTag::Public);
    }

    #[test]
    fn test_fan_out_within_set() {
        let c = Classifier::new(ClassificationRule::new(
            ["bidding-logic.py", "logic.py", "unused.py"],
            Vec::<String>::new(),
        ));

        let found = c.matches_for(ClassificationTag::Private, "https://x/bidding-logic.py");
        assert_eq!(found, vec!["bidding-logic.py", "logic.py"]);
    }

    #[test]
    fn test_no_normalization() {
        let c = classifier();
        assert_eq!(c.classify("https://x/SECRET.PY"), None);
    }

    #[test]
    fn test_default_classifier() {
        let c = Classifier::default();
        assert_eq!(
            c.classify("https://a.test/resources/trusted-bidding-signals.py?keys=1"),
            Some(ClassificationTag::Private)
        );
        assert_eq!(
            c.classify("https://a.test/resources/direct-from-seller-signals.py"),
            Some(ClassificationTag::Public)
        );
    }
}
