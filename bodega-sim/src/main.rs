//! Bodega stress simulation
//!
//! Runs randomized order batches against the in-memory checkout stack
//! and prints the audited report as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Run with the default seed
//! cargo run -p bodega-sim
//!
//! # Run with a specific seed
//! cargo run -p bodega-sim -- 42
//! ```

use anyhow::Context;
use bodega_sim::{run_simulation, SimConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("bodega_sim=info".parse()?))
        .init();

    let mut config = SimConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        config.seed = arg
            .parse::<u64>()
            .with_context(|| format!("Invalid seed argument: {}", arg))?;
    }

    let report = run_simulation(config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
