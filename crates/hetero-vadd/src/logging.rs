//! `tracing` subscriber setup for the example programs.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: OnceCell<()> = OnceCell::new();

/// Installs a stderr fmt layer filtered by `RUST_LOG` (default `warn`).
/// Later calls are no-ops.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // A subscriber installed by the host application wins.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
        tracing::debug!("logging initialised twice without panicking");
    }
}
