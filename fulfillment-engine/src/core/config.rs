//! Engine configuration
//!
//! # Environment variables
//!
//! Every field can be overridden through the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DATA_DIR | /var/lib/fulfillment | Directory holding the redb database |
//! | DB_FILE | engine.redb | Database file name inside DATA_DIR |
//! | DEFAULT_MATCH_RADIUS_KM | 10 | Radius used when a match query gives none |
//! | NOTIFICATION_LIST_LIMIT | 50 | Max notifications returned per owner query |

/// Fallback radius for vendor matching when the caller gives none, km
pub const DEFAULT_MATCH_RADIUS_KM: f64 = 10.0;

/// Default cap on notifications returned per owner query
pub const DEFAULT_NOTIFICATION_LIST_LIMIT: usize = 50;

/// Engine configuration, loaded once at startup and passed explicitly
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the database file
    pub data_dir: String,
    /// Database file name inside `data_dir`
    pub db_file: String,
    /// Fallback radius for vendor matching, km
    pub default_match_radius_km: f64,
    /// Cap on notifications returned per owner query
    pub notification_list_limit: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/fulfillment".into()),
            db_file: std::env::var("DB_FILE").unwrap_or_else(|_| "engine.redb".into()),
            default_match_radius_km: std::env::var("DEFAULT_MATCH_RADIUS_KM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MATCH_RADIUS_KM),
            notification_list_limit: std::env::var("NOTIFICATION_LIST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_NOTIFICATION_LIST_LIMIT),
        }
    }

    /// Full path to the database file
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.db_file)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
