// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for reqvis
//!
//! Request/response types carried through the request path, and the
//! reqwest-backed client used as the default transport.

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use request::{Initiator, Request};
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("reqvis/", env!("CARGO_PKG_VERSION"));
