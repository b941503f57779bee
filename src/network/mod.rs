// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network interception
//!
//! The request path, the hook where interceptors are installed, and the
//! visibility probe interceptor.

mod hook;
mod interceptor_trait;
mod log;
mod path;
mod visibility;

pub use hook::{InterceptionHook, Registration, INSTALL_CONTEXT};
pub use interceptor_trait::{InterceptAction, InterceptorChain, RequestInterceptor};
pub use log::{LogEntry, RequestLog};
pub use path::{RequestPath, Transport};
pub use visibility::{
    InterceptorStats, StatsSnapshot, VisibilityInterceptor, VISIBILITY_INTERCEPTOR_NAME,
};
