// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Verdict notification
//!
//! Publishes one verdict per classified request on a topic scoped to the
//! request's classification tag.

mod event;
mod notifier;
mod topic;

pub use event::{Observation, Verdict, VerdictResult};
pub use notifier::{Notifier, Published};
pub use topic::{Topic, TopicBus, TopicSubscription, DEFAULT_CHANNEL_CAPACITY};

use crate::classify::ClassificationTag;

/// Default suffix appended to a tag to form its topic name
pub const DEFAULT_TOPIC_SUFFIX: &str = "-requests-test";

/// Well-known topic name for a tag, e.g. `private-requests-test`
pub fn topic_name(tag: ClassificationTag) -> String {
    format!("{}{}", tag, DEFAULT_TOPIC_SUFFIX)
}
