use clap::Parser;

use crate::pool::RecyclerConfig;

/// recycler-churn - drive acquire/release traffic through a pool registry
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of acquire/release rounds
    #[arg(short, long, default_value = "100000")]
    pub iterations: usize,

    /// Instances checked out at once in each round
    #[arg(short, long, default_value = "16")]
    pub batch: usize,

    /// Instances pre-allocated with expand before the run
    #[arg(short, long, default_value = "0")]
    pub prefill: usize,

    /// Enable recycler instrumentation
    #[arg(long)]
    pub tracking: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse_args() -> Self {
        Config::parse()
    }

    /// Recycler options derived from the run shape.
    pub fn recycler_config(&self) -> RecyclerConfig {
        RecyclerConfig::with_capacity(self.prefill.max(self.batch)).tracking(self.tracking)
    }

    /// Acquires issued over the whole run: `batch` particles plus one
    /// scratch vec per round. Saturates instead of overflowing.
    pub fn total_acquires(&self) -> usize {
        self.iterations.saturating_mul(self.batch.saturating_add(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            batch: 16,
            prefill: 0,
            tracking: false,
            log_level: "info".to_string(),
        }
    }
}
