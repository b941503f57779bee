// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request path
//!
//! The route every outbound request takes. Page-initiated requests are shown
//! to whatever is installed in the hook; isolated requests go straight to the
//! transport. This split is the property under audit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::debug;

use super::hook::InterceptionHook;
use super::interceptor_trait::InterceptAction;
use super::log::{LogEntry, RequestLog};
use crate::error::{Error, Result};
use crate::http::{Request, Response};

/// Sends a request once interception is done
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// Outbound request path with an interception hook
#[derive(Clone)]
pub struct RequestPath {
    hook: InterceptionHook,
    transport: Arc<dyn Transport>,
    log: RequestLog,
}

impl RequestPath {
    /// Create a path sending through `transport`
    pub fn new<T: Transport + 'static>(hook: InterceptionHook, transport: T) -> Self {
        Self {
            hook,
            transport: Arc::new(transport),
            log: RequestLog::new(),
        }
    }

    /// Use a shared request log
    pub fn with_log(mut self, log: RequestLog) -> Self {
        self.log = log;
        self
    }

    /// Get the hook
    pub fn hook(&self) -> &InterceptionHook {
        &self.hook
    }

    /// Get the request log
    pub fn log(&self) -> &RequestLog {
        &self.log
    }

    /// Dispatch a page GET
    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.dispatch(Request::get(url)?).await
    }

    /// Dispatch an isolated GET that must bypass interception
    pub async fn get_isolated(&self, url: impl AsRef<str>) -> Result<Response> {
        self.dispatch(Request::get(url)?.isolated()).await
    }

    /// Dispatch several requests concurrently, results in input order
    pub async fn dispatch_all(&self, requests: Vec<Request>) -> Vec<Result<Response>> {
        join_all(requests.into_iter().map(|request| self.dispatch(request))).await
    }

    /// Dispatch a request
    pub async fn dispatch(&self, mut request: Request) -> Result<Response> {
        let registration = if request.initiator.is_interceptable() {
            self.hook.active()
        } else {
            None
        };
        let intercepted = registration.is_some();

        if let Some(ref registration) = registration {
            match registration.chain().process_request(&mut request).await {
                InterceptAction::Continue => {}
                InterceptAction::Delay(duration) => tokio::time::sleep(duration).await,
                InterceptAction::Abort(reason) => {
                    let err = Error::aborted(request.url.as_str(), reason);
                    registration.chain().notify_error(&request, &err).await;
                    self.record(&request, intercepted, false, None, Some(err.to_string()));
                    return Err(err);
                }
                InterceptAction::MockResponse(response) => {
                    self.record(&request, intercepted, false, Some(response.status_code()), None);
                    return Ok(response);
                }
            }
        }

        debug!(
            url = %request.url,
            initiator = ?request.initiator,
            intercepted,
            "Dispatching request"
        );

        match self.transport.execute(request.clone()).await {
            Ok(mut response) => {
                self.record(&request, intercepted, true, Some(response.status_code()), None);
                if let Some(ref registration) = registration {
                    registration
                        .chain()
                        .process_response(&request, &mut response)
                        .await?;
                }
                Ok(response)
            }
            Err(err) => {
                if let Some(ref registration) = registration {
                    registration.chain().notify_error(&request, &err).await;
                }
                self.record(&request, intercepted, false, None, Some(err.to_string()));
                Err(err)
            }
        }
    }

    fn record(
        &self,
        request: &Request,
        intercepted: bool,
        delivered: bool,
        status: Option<u16>,
        error: Option<String>,
    ) {
        self.log.record(LogEntry {
            timestamp: Utc::now(),
            method: request.method.to_string(),
            url: request.url.to_string(),
            initiator: request.initiator,
            intercepted,
            delivered,
            status,
            error,
        });
    }
}
