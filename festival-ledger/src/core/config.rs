use std::path::PathBuf;

/// Ledger configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Directory holding the database file |
/// | LEDGER_DB_FILE | ledger.redb | Database file name inside WORK_DIR |
/// | LOG_LEVEL | info | Default tracing filter |
/// | LOG_JSON | false | Emit JSON log lines |
/// | LOG_DIR | (unset) | Enables the daily rolling log file |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/festival LOG_LEVEL=debug cargo run --bin ledger-report
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database file
    pub work_dir: String,
    pub database_file: String,
    pub log_level: String,
    pub log_json: bool,
    /// Rolling log directory, stdout only when absent
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present)
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_file: std::env::var("LEDGER_DB_FILE")
                .unwrap_or_else(|_| "ledger.redb".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the work directory, keeping everything else from the environment
    ///
    /// Mostly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Full path of the database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
