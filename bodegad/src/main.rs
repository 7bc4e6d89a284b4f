//! Bodega Daemon
//!
//! Demo runtime for the checkout subsystem: seeds a catalog, runs a
//! contended order batch through the scheduler, persists receipts, and
//! reconciles the final stock.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run -p bodegad
//!
//! # Run with a bigger demo batch
//! BODEGA_DEMO_ORDERS=50 BODEGA_WORKERS=8 cargo run -p bodegad
//! ```
//!
//! # Environment Variables
//!
//! - `BODEGA_ENV`: Environment (test, development, production)
//! - `BODEGA_WORKERS`: Scheduler pool size (default: available parallelism)
//! - `BODEGA_LOCK_TIMEOUT_MS`: Lock acquisition timeout (default: 500)
//! - `BODEGA_DEMO_ORDERS`: Orders in the demo batch (default: 12)
//! - `BODEGA_DEMO_UNITS`: Units per demo order line (default: 2)

use bodegad::{Config, Daemon};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("bodegad=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        workers = config.pool.workers,
        demo_orders = config.demo.orders,
        "Bodega Daemon"
    );

    // Create and run daemon
    let daemon = Daemon::new_stub(config)?;
    daemon.run().await?;

    Ok(())
}
