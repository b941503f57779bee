// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # reqvis - Request Visibility Audit
//!
//! Checks which outbound requests an interception layer is allowed to see.
//! A probe interceptor is installed in the request path; every request it is
//! shown is classified against private and public address patterns and
//! reported as a verdict on a per-tag topic. Verifiers turn those verdicts
//! into a pass or fail:
//!
//! - Private requests must never reach the interceptor. Passing is the
//!   absence of a `failed` verdict for the lifetime of an action, guarded by
//!   a liveness check so a run where nothing happened does not count.
//! - Public requests must reach it. The trigger is re-issued until the first
//!   `passed` verdict, within an explicit bound.
//!
//! ## Example
//!
//! ```rust,no_run
//! use reqvis::{
//!     AuditConfig, Classifier, HttpClient, InterceptionHook, RequestPath, TrackedRequests,
//!     VisibilityAudit,
//! };
//!
//! #[tokio::main]
//! async fn main() -> reqvis::Result<()> {
//!     reqvis::logging::init();
//!
//!     let hook = InterceptionHook::new();
//!     let audit =
//!         VisibilityAudit::install(hook.clone(), Classifier::default(), AuditConfig::default())
//!             .await?;
//!     let path = RequestPath::new(hook, HttpClient::new()?);
//!
//!     let action = async {
//!         path.get("https://fledge.test/auction.html?uuid=1").await?;
//!         path.get_isolated("https://fledge.test/resources/bidding-logic.py?uuid=1").await?;
//!         Ok::<_, reqvis::Error>(())
//!     };
//!     let stash = TrackedRequests::new(path.log().clone(), "uuid=1");
//!     let expected = vec![
//!         "https://fledge.test/auction.html?uuid=1".to_string(),
//!         "https://fledge.test/resources/bidding-logic.py?uuid=1".to_string(),
//!     ];
//!
//!     let report = audit.run_private(action, &stash, &expected).await?;
//!     println!("{:?}", report.verdict());
//!     report.into_result()
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod network;
pub mod notify;
pub mod verify;

// Classification
pub use classify::{ClassificationRule, ClassificationTag, Classifier, PatternMatch};

// Configuration
pub use config::{AuditConfig, LivenessConfig, PositiveConfig};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{HttpClient, HttpClientConfig, Initiator, Request, Response};

// Interception
pub use network::{
    InterceptAction, InterceptionHook, InterceptorChain, RequestInterceptor, RequestLog,
    RequestPath, Transport, VisibilityInterceptor,
};

// Verdicts
pub use notify::{Notifier, Observation, Topic, TopicBus, Verdict, VerdictResult};

// Verification
pub use verify::{
    wait_for_observed_requests, AuditReport, AuditVerdict, HttpRequestLog, Liveness,
    LivenessProbe, NegativeVerifier, Outcome, PositiveVerifier, TrackedRequests,
    VisibilityAudit,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
