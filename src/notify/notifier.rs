// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Classifier + topic publisher

use std::sync::Arc;

use super::event::Verdict;
use super::topic::{Topic, TopicBus};
use super::DEFAULT_TOPIC_SUFFIX;
use crate::classify::{ClassificationTag, Classifier};

/// Verdicts published for one address, per tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Published {
    pub private: usize,
    pub public: usize,
}

impl Published {
    /// Total verdicts published
    pub fn total(&self) -> usize {
        self.private + self.public
    }
}

/// Turns request addresses into published verdicts.
///
/// Stateless apart from the shared bus: safe to call from any number of
/// concurrent interception callbacks.
#[derive(Clone)]
pub struct Notifier {
    classifier: Arc<Classifier>,
    bus: TopicBus,
    suffix: String,
}

impl Notifier {
    /// Create a notifier publishing on `bus`
    pub fn new(classifier: Classifier, bus: TopicBus) -> Self {
        Self {
            classifier: Arc::new(classifier),
            bus,
            suffix: DEFAULT_TOPIC_SUFFIX.to_string(),
        }
    }

    /// Override the topic name suffix
    pub fn topic_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Topic name for a tag
    pub fn topic_name(&self, tag: ClassificationTag) -> String {
        format!("{}{}", tag, self.suffix)
    }

    /// Open the topic for a tag
    pub fn topic(&self, tag: ClassificationTag) -> Topic {
        self.bus.topic(&self.topic_name(tag))
    }

    /// Publish a verdict on the topic for `tag`.
    ///
    /// Opens a fresh topic instance per delivery; it joins the existing
    /// group, so current subscribers still receive it.
    pub fn notify(&self, tag: ClassificationTag, verdict: Verdict) -> usize {
        self.topic(tag).publish(verdict)
    }

    /// Classify an address and publish one verdict per matching pattern
    pub fn notify_address(&self, address: &str) -> Published {
        let mut published = Published::default();

        for found in self.classifier.matches(address) {
            match found.tag {
                ClassificationTag::Private => {
                    tracing::warn!(url = %address, pattern = found.pattern, "Private request observed");
                    published.private += 1;
                }
                ClassificationTag::Public => {
                    tracing::debug!(url = %address, pattern = found.pattern, "Public request observed");
                    published.public += 1;
                }
            }
            self.notify(found.tag, Verdict::for_match(&found));
        }

        published
    }

    /// Get the classifier
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Get the bus
    pub fn bus(&self) -> &TopicBus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassificationRule;

    fn notifier() -> Notifier {
        Notifier::new(
            Classifier::new(ClassificationRule::new(["secret.py"], ["public.py"])),
            TopicBus::new(),
        )
    }

    #[test]
    fn test_topic_names() {
        let n = notifier();
        assert_eq!(n.topic_name(ClassificationTag::Private), "private-requests-test");
        assert_eq!(n.topic_name(ClassificationTag::Public), "public-requests-test");

        let n = n.topic_suffix("-audit");
        assert_eq!(n.topic_name(ClassificationTag::Public), "public-audit");
    }

    #[tokio::test]
    async fn test_private_address_publishes_failed() {
        let n = notifier();
        let mut private = n.topic(ClassificationTag::Private).subscribe();
        let mut public = n.topic(ClassificationTag::Public).subscribe();

        assert_eq!(n.notify_address("https://x/secret.py?id=1").private, 1);

        let observed = private.drain();
        assert_eq!(observed.len(), 1);
        assert!(observed[0].verdict.is_failed());
        assert!(observed[0].verdict.message.contains("secret.py"));
        assert!(public.drain().is_empty());
    }

    #[tokio::test]
    async fn test_public_address_publishes_passed() {
        let n = notifier();
        let mut public = n.topic(ClassificationTag::Public).subscribe();

        assert_eq!(n.notify_address("https://x/public.py").public, 1);

        let observed = public.drain();
        assert_eq!(observed.len(), 1);
        assert!(observed[0].verdict.is_passed());
    }

    #[tokio::test]
    async fn test_fan_out_count_matches_pattern_count() {
        let n = Notifier::new(
            Classifier::new(ClassificationRule::new(
                ["bidding-logic.py", "logic.py", "bidding"],
                Vec::<String>::new(),
            )),
            TopicBus::new(),
        );
        let mut private = n.topic(ClassificationTag::Private).subscribe();

        let published = n.notify_address("https://x/bidding-logic.py");
        assert_eq!(published, Published { private: 3, public: 0 });
        let observed = private.drain();
        assert_eq!(observed.len(), 3);
        assert!(observed.iter().all(|o| o.verdict.is_failed()));
    }

    #[tokio::test]
    async fn test_cross_set_match_hits_both_topics() {
        let n = notifier();
        let mut private = n.topic(ClassificationTag::Private).subscribe();
        let mut public = n.topic(ClassificationTag::Public).subscribe();

        assert_eq!(n.notify_address("https://x/public.py?from=secret.py").total(), 2);
        assert_eq!(private.drain().len(), 1);
        assert_eq!(public.drain().len(), 1);
    }

    #[test]
    fn test_unclassified_address_is_ignored() {
        let n = notifier();
        assert_eq!(n.notify_address("https://x/index.html").total(), 0);
        assert_eq!(n.bus().events_published(), 0);
    }
}
