use std::time::Duration;

/// Safe Browsing transparency report status lookup. Takes a single `site` query parameter.
pub const ENDPOINT: &str =
    "https://transparencyreport.google.com/transparencyreport/api/v3/safebrowsing/status";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(5);
/// Pause between two domains, whatever the outcome of the first one.
pub const THROTTLE_DELAY: Duration = Duration::from_secs(2);

pub const DOMAINS_FILE: &str = "domains.txt";
pub const DANGEROUS_FILE: &str = "dangerdomains.txt";
pub const LOG_FILE: &str = "safebrowsing_log.txt";

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub endpoint: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub throttle_delay: Duration,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
            throttle_delay: THROTTLE_DELAY,
        }
    }
}
