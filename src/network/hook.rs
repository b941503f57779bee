// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interception hook lifecycle
//!
//! The hook is the single slot in a request path where interceptors are
//! installed. It is shared state, so it is created once and handed to the
//! components that need it instead of being reached through a global:
//! 1. `install` runs interceptor setup and publishes a registration
//! 2. `ready` waits until a registration is active
//! 3. `teardown` removes it

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use super::interceptor_trait::{InterceptorChain, RequestInterceptor};
use crate::error::{Error, ErrorContext, Result};

/// Context attached to installation failures
pub const INSTALL_CONTEXT: &str = "Error while installing interceptor";

/// An installed interceptor chain
pub struct Registration {
    id: u64,
    chain: InterceptorChain,
    installed_at: DateTime<Utc>,
}

impl Registration {
    /// Registration ID, unique per hook
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Installed chain
    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    /// Install time
    pub fn installed_at(&self) -> DateTime<Utc> {
        self.installed_at
    }

    /// Check if an interceptor with this name is part of the registration
    pub fn includes(&self, name: &str) -> bool {
        self.chain.names().iter().any(|n| n == name)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("interceptors", &self.chain.names())
            .field("installed_at", &self.installed_at)
            .finish()
    }
}

/// Slot holding the active registration
#[derive(Clone)]
pub struct InterceptionHook {
    slot: Arc<watch::Sender<Option<Arc<Registration>>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InterceptionHook {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptionHook {
    /// Create an empty hook
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Install a single interceptor, replacing any active registration
    pub async fn install<I: RequestInterceptor + 'static>(
        &self,
        interceptor: I,
    ) -> Result<Arc<Registration>> {
        self.install_shared(Arc::new(interceptor)).await
    }

    /// Install an already shared interceptor
    pub async fn install_shared(
        &self,
        interceptor: Arc<dyn RequestInterceptor>,
    ) -> Result<Arc<Registration>> {
        let mut chain = InterceptorChain::new();
        chain.add_shared(interceptor);
        self.install_chain(chain).await
    }

    /// Install a chain.
    ///
    /// Every interceptor's `setup` must succeed; otherwise nothing is
    /// installed and the cause is returned as `Error::SetupFailure`.
    pub async fn install_chain(&self, chain: InterceptorChain) -> Result<Arc<Registration>> {
        if chain.is_empty() {
            return Err(Error::setup_failure(
                INSTALL_CONTEXT,
                Error::config("no interceptors to install"),
            ));
        }

        chain.setup().await.setup_context(INSTALL_CONTEXT)?;

        let registration = Arc::new(Registration {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            chain,
            installed_at: Utc::now(),
        });

        let previous = self.slot.send_replace(Some(registration.clone()));
        info!(
            id = registration.id,
            interceptors = ?registration.chain.names(),
            replaced = previous.is_some(),
            "Interceptor installed"
        );

        Ok(registration)
    }

    /// Install `factory()` unless an interceptor named `name` is already active
    pub async fn ensure_installed<I, F>(&self, name: &str, factory: F) -> Result<Arc<Registration>>
    where
        I: RequestInterceptor + 'static,
        F: FnOnce() -> I,
    {
        if let Some(active) = self.active().filter(|r| r.includes(name)) {
            return Ok(active);
        }
        self.install(factory()).await
    }

    /// Active registration, if any
    pub fn active(&self) -> Option<Arc<Registration>> {
        self.slot.borrow().clone()
    }

    /// Check if an interceptor named `name` is active
    pub fn is_controlled_by(&self, name: &str) -> bool {
        self.active().map(|r| r.includes(name)).unwrap_or(false)
    }

    /// Wait until a registration is active
    pub async fn ready(&self) -> Arc<Registration> {
        let mut rx = self.slot.subscribe();
        loop {
            if let Some(registration) = rx.borrow_and_update().clone() {
                return registration;
            }
            // The sender lives as long as `self`
            let _ = rx.changed().await;
        }
    }

    /// Wait until a registration is active, up to `timeout`
    pub async fn ready_timeout(&self, timeout: Duration) -> Result<Arc<Registration>> {
        tokio::time::timeout(timeout, self.ready())
            .await
            .map_err(|_| Error::timeout("interceptor ready", timeout.as_millis() as u64))
    }

    /// Remove the active registration, returning it
    pub fn teardown(&self) -> Option<Arc<Registration>> {
        let previous = self.slot.send_replace(None);
        if let Some(ref registration) = previous {
            info!(id = registration.id, "Interceptor removed");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Probe(&'static str);

    #[async_trait]
    impl RequestInterceptor for Probe {
        fn name(&self) -> &str {
            self.0
        }
    }

    struct Broken;

    #[async_trait]
    impl RequestInterceptor for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn setup(&self) -> Result<()> {
            Err(Error::config("script failed to load"))
        }
    }

    #[tokio::test]
    async fn test_install_and_teardown() {
        let hook = InterceptionHook::new();
        assert!(hook.active().is_none());

        let registration = hook.install(Probe("probe")).await.unwrap();
        assert!(hook.is_controlled_by("probe"));
        assert!(!hook.is_controlled_by("other"));
        assert_eq!(hook.active().unwrap().id(), registration.id());

        let removed = hook.teardown().unwrap();
        assert_eq!(removed.id(), registration.id());
        assert!(hook.active().is_none());
        assert!(hook.teardown().is_none());
    }

    #[tokio::test]
    async fn test_install_failure_is_setup_failure() {
        let hook = InterceptionHook::new();
        let err = hook.install(Broken).await.unwrap_err();

        assert!(err.is_setup_failure());
        assert!(err.to_string().starts_with(INSTALL_CONTEXT));
        assert!(err.to_string().contains("script failed to load"));
        assert!(hook.active().is_none());
    }

    #[tokio::test]
    async fn test_empty_chain_rejected() {
        let hook = InterceptionHook::new();
        let err = hook.install_chain(InterceptorChain::new()).await.unwrap_err();
        assert!(err.is_setup_failure());
    }

    #[tokio::test]
    async fn test_ready_waits_for_install() {
        let hook = InterceptionHook::new();
        let waiter = {
            let hook = hook.clone();
            tokio::spawn(async move { hook.ready().await.id() })
        };

        tokio::task::yield_now().await;
        let registration = hook.install(Probe("probe")).await.unwrap();

        let id = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("timeout")
            .expect("join");
        assert_eq!(id, registration.id());
    }

    #[tokio::test]
    async fn test_ready_timeout() {
        let hook = InterceptionHook::new();
        let err = hook
            .ready_timeout(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_ensure_installed_reuses_or_replaces() {
        let hook = InterceptionHook::new();
        let first = hook.ensure_installed("probe", || Probe("probe")).await.unwrap();
        let again = hook.ensure_installed("probe", || Probe("probe")).await.unwrap();
        assert_eq!(first.id(), again.id());

        let replaced = hook.ensure_installed("other", || Probe("other")).await.unwrap();
        assert_ne!(replaced.id(), first.id());
        assert!(hook.is_controlled_by("other"));
        assert!(!hook.is_controlled_by("probe"));
    }
}
