// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request interceptor trait and chain
//!
//! Middleware pattern similar to a service worker `fetch` handler: every
//! interceptable request passes through the chain before it is sent.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::http::{Request, Response};

/// Request interceptor trait
///
/// # Example
///
/// ```rust,no_run
/// use reqvis::network::{RequestInterceptor, InterceptAction};
/// use reqvis::http::Request;
/// use async_trait::async_trait;
///
/// struct Tracer;
///
/// #[async_trait]
/// impl RequestInterceptor for Tracer {
///     fn name(&self) -> &str {
///         "tracer"
///     }
///
///     async fn before_request(&self, req: &mut Request) -> InterceptAction {
///         println!("saw {}", req.url);
///         InterceptAction::Continue
///     }
/// }
/// ```
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Identifies the interceptor; used to validate which one is installed
    fn name(&self) -> &str;

    /// Called once while the interceptor is being installed
    ///
    /// An error here aborts installation.
    async fn setup(&self) -> Result<()> {
        Ok(())
    }

    /// Called before a request is sent
    ///
    /// Can modify the request or abort it entirely.
    async fn before_request(&self, _request: &mut Request) -> InterceptAction {
        InterceptAction::Continue
    }

    /// Called after a response is received
    async fn after_response(&self, _request: &Request, _response: &mut Response) -> Result<()> {
        Ok(())
    }

    /// Called when request fails
    async fn on_error(&self, _request: &Request, _error: &Error) {}

    /// Filter - return true if this interceptor should handle the request
    fn should_intercept(&self, _request: &Request) -> bool {
        true
    }

    /// Priority - higher priority interceptors run first
    fn priority(&self) -> i32 {
        0
    }
}

/// Action to take after interception
#[derive(Debug, Clone)]
pub enum InterceptAction {
    /// Continue with the (possibly modified) request
    Continue,
    /// Abort the request with an error
    Abort(String),
    /// Return a mock response instead of making the actual request
    MockResponse(Response),
    /// Pause the request before sending
    Delay(std::time::Duration),
}

/// Interceptor chain - manages multiple interceptors
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl InterceptorChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Add an interceptor
    pub fn add<I: RequestInterceptor + 'static>(&mut self, interceptor: I) {
        self.add_shared(Arc::new(interceptor));
    }

    /// Add an already shared interceptor
    pub fn add_shared(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.interceptors.push(interceptor);
        // Sort by priority (highest first)
        self.interceptors.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Names of the interceptors in run order
    pub fn names(&self) -> Vec<String> {
        self.interceptors.iter().map(|i| i.name().to_string()).collect()
    }

    /// Number of interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run `setup` on every interceptor, stopping at the first error
    pub async fn setup(&self) -> Result<()> {
        for interceptor in &self.interceptors {
            interceptor.setup().await?;
        }
        Ok(())
    }

    /// Process request through all interceptors
    pub async fn process_request(&self, request: &mut Request) -> InterceptAction {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }

            match interceptor.before_request(request).await {
                InterceptAction::Continue => continue,
                action => return action,
            }
        }
        InterceptAction::Continue
    }

    /// Process response through all interceptors
    pub async fn process_response(&self, request: &Request, response: &mut Response) -> Result<()> {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }
            interceptor.after_response(request, response).await?;
        }
        Ok(())
    }

    /// Notify interceptors of an error
    pub async fn notify_error(&self, request: &Request, error: &Error) {
        for interceptor in &self.interceptors {
            if interceptor.should_intercept(request) {
                interceptor.on_error(request, error).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Named {
        name: &'static str,
        priority: i32,
        seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RequestInterceptor for Named {
        fn name(&self) -> &str {
            self.name
        }

        async fn before_request(&self, _request: &mut Request) -> InterceptAction {
            self.seen.fetch_add(1, Ordering::SeqCst);
            InterceptAction::Continue
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    struct Blocker;

    #[async_trait]
    impl RequestInterceptor for Blocker {
        fn name(&self) -> &str {
            "blocker"
        }

        async fn before_request(&self, _request: &mut Request) -> InterceptAction {
            InterceptAction::Abort("blocked".to_string())
        }

        fn should_intercept(&self, request: &Request) -> bool {
            request.url.path().ends_with(".wasm")
        }

        fn priority(&self) -> i32 {
            100
        }
    }

    #[test]
    fn test_chain_orders_by_priority() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut chain = InterceptorChain::new();
        chain.add(Named {
            name: "low",
            priority: -10,
            seen: seen.clone(),
        });
        chain.add(Named {
            name: "high",
            priority: 10,
            seen,
        });

        assert_eq!(chain.names(), vec!["high", "low"]);
        assert_eq!(chain.len(), 2);
    }

    #[tokio::test]
    async fn test_chain_stops_on_abort() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut chain = InterceptorChain::new();
        chain.add(Blocker);
        chain.add(Named {
            name: "counter",
            priority: 0,
            seen: seen.clone(),
        });

        let mut wasm = Request::get("https://a.test/bidding-wasmlogic.wasm").unwrap();
        assert!(matches!(
            chain.process_request(&mut wasm).await,
            InterceptAction::Abort(_)
        ));
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        let mut page = Request::get("https://a.test/index.html").unwrap();
        assert!(matches!(
            chain.process_request(&mut page).await,
            InterceptAction::Continue
        ));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
