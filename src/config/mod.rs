mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Values supplied by the embedding process (typically parsed from its CLI).
/// TOML file values override these where present.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub chart_size: Option<usize>,
    pub default_currency: Option<String>,
    pub stats_retention_days: Option<u32>,
    pub read_pool_size: Option<usize>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    /// Number of entries in the top/weekly song charts.
    pub chart_size: usize,
    /// Currency recorded on a sale when the payment collaborator omits one.
    pub default_currency: String,
    /// Days of daily stats to retain when pruning. 0 disables pruning.
    pub stats_retention_days: u32,
    /// Number of read connections the market store opens.
    pub read_pool_size: usize,
}

pub const DEFAULT_CHART_SIZE: usize = 15;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

impl AppConfig {
    /// Resolves configuration from process-supplied values and an optional
    /// TOML file config. TOML values win where both are present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| anyhow::anyhow!("db_dir must be specified"))?;
        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let chart_size = file
            .chart_size
            .or(cli.chart_size)
            .unwrap_or(DEFAULT_CHART_SIZE);
        if chart_size == 0 {
            bail!("chart_size must be at least 1");
        }

        let default_currency = file
            .default_currency
            .or_else(|| cli.default_currency.clone())
            .unwrap_or_else(|| "USD".to_string());

        let stats_retention_days = file
            .stats_retention_days
            .or(cli.stats_retention_days)
            .unwrap_or(0);

        let read_pool_size = file
            .read_pool_size
            .or(cli.read_pool_size)
            .unwrap_or(DEFAULT_READ_POOL_SIZE)
            .max(1);

        Ok(Self {
            db_dir,
            chart_size,
            default_currency,
            stats_retention_days,
            read_pool_size,
        })
    }

    pub fn market_db_path(&self) -> PathBuf {
        self.db_dir.join("market.db")
    }
}
