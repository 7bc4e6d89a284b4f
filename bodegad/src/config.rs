//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use bodega_scheduler::SchedulerConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Worker pool configuration
    pub pool: PoolConfig,

    /// Checkout configuration
    pub checkout: CheckoutConfig,

    /// Demo workload configuration
    pub demo: DemoConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Scheduler worker pool size
    pub workers: usize,
}

/// Checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Lock acquisition timeout in milliseconds
    pub lock_timeout_ms: u64,
}

impl CheckoutConfig {
    /// Lock timeout as a [`Duration`].
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Demo workload configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Orders in the demo batch
    pub orders: usize,
    /// Units each demo order asks for per line
    pub units_per_order: u32,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (uses stubs)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let pool = PoolConfig {
            workers: Self::load_env("BODEGA_WORKERS", SchedulerConfig::default().workers)?,
        };
        let checkout = CheckoutConfig {
            lock_timeout_ms: Self::load_env("BODEGA_LOCK_TIMEOUT_MS", 500u64)?,
        };
        let demo = DemoConfig {
            orders: Self::load_env("BODEGA_DEMO_ORDERS", 12usize)?,
            units_per_order: Self::load_env("BODEGA_DEMO_UNITS", 2u32)?,
        };

        Ok(Self {
            pool,
            checkout,
            demo,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            pool: PoolConfig { workers: 2 },
            checkout: CheckoutConfig { lock_timeout_ms: 200 },
            demo: DemoConfig {
                orders: 4,
                units_per_order: 1,
            },
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("BODEGA_ENV").unwrap_or_else(|_| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid BODEGA_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_env<T: FromStr>(key: &str, default: T) -> DaemonResult<T> {
        match env::var(key) {
            Ok(val) => val
                .parse::<T>()
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool: PoolConfig {
                workers: SchedulerConfig::default().workers,
            },
            checkout: CheckoutConfig { lock_timeout_ms: 500 },
            demo: DemoConfig {
                orders: 12,
                units_per_order: 2,
            },
            environment: Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
