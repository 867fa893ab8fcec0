//! Tracing setup for the CLI.
//!
//! The subscriber is only installed when `CJS2ESM_LOG` (or `RUST_LOG`) is
//! set. Values use `RUST_LOG` syntax, e.g. `debug` or
//! `ce_transform::resolve=trace`. Output goes to stderr so it never mixes
//! with converted code on stdout.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CJS2ESM_LOG";

pub fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
