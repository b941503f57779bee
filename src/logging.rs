// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Log subscriber setup
//!
//! `RUST_LOG` is honoured; `reqvis=info` is always added on top of it.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Directive added to whatever `RUST_LOG` specifies
pub const DEFAULT_DIRECTIVE: &str = "reqvis=info";

fn env_filter() -> Result<EnvFilter> {
    let directive = DEFAULT_DIRECTIVE
        .parse()
        .map_err(|e| Error::config(format!("invalid log directive: {}", e)))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Install the global fmt subscriber, failing if one is already set
pub fn try_init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .try_init()
        .map_err(|e| Error::config(format!("log subscriber already set: {}", e)))
}

/// Install the global fmt subscriber. A second call is a no-op.
pub fn init() {
    let _ = try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        assert!(env_filter().is_ok());
    }

    #[test]
    fn test_init_twice() {
        init();
        assert!(try_init().is_err());
    }
}
