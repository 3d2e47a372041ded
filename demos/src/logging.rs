// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging setup for the demo binary.

use std::env;

use tracing_subscriber::fmt::time::uptime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Our crates log at debug, everything else at warn.
const DEFAULT_FILTER: &str =
    "warn,blendint_context=debug,blendint_view=debug,blendint_demos=debug";

/// Install a compact stdout subscriber.
///
/// `RUST_LOG` directives are appended to the defaults, so they win.
pub(crate) fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer().event_format(format);

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)
}
