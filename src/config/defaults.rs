use super::*;

/// Tibber's public GraphQL endpoint
pub const DEFAULT_TIBBER_ENDPOINT: &str = "https://api.tibber.com/v1-beta/gql";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// One minute between price polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_LOG_FILE: &str = "/tmp/tibber-timer.log";

impl Default for TibberConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            home_id: String::new(),
            endpoint: DEFAULT_TIBBER_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: DEFAULT_LOG_FILE.to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tibber: TibberConfig::default(),
            run_profile: RunProfile::default(),
            hour_arithmetic: HourArithmetic::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            logging: LoggingConfig::default(),
        }
    }
}
