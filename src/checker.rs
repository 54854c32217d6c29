use tracing::{debug, error, info, warn};

use crate::client::{ReputationClient, ReputationResponse};
use crate::domain;
use crate::error::CheckError;
use crate::retry::{RetryPolicy, Sleeper};
use crate::stats::{CheckOutcome, RunTally};

const TOO_MANY_REQUESTS: u16 = 429;

/// Classifies domains one at a time against a [`ReputationClient`].
pub struct DomainChecker<C, S> {
    client: C,
    sleeper: S,
    policy: RetryPolicy,
}

impl<C: ReputationClient, S: Sleeper> DomainChecker<C, S> {
    pub fn new(client: C, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            client,
            sleeper,
            policy,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Runs up to `max_attempts` lookups for `domain` and records the single
    /// terminal outcome in `tally`.
    pub fn check(&self, domain: &str, tally: &mut RunTally) -> CheckOutcome {
        let mut attempt = 1;

        let outcome = loop {
            match self.attempt(domain, attempt) {
                Ok(outcome) => break outcome,
                Err(err) if err.is_retryable() => {
                    if self.policy.can_retry(attempt) {
                        self.report_retry(domain, attempt, &err);
                        self.sleeper.sleep(self.policy.delay);
                        attempt += 1;
                        continue;
                    }
                    report_exhausted(domain, &err);
                    break CheckOutcome::Skipped;
                }
                Err(err) => {
                    report_failure(domain, &err);
                    break CheckOutcome::Invalid;
                }
            }
        };

        debug!(action = "record", component = "checker", domain, attempts = attempt, outcome = %outcome, "Recorded outcome");
        tally.record(domain, outcome);
        outcome
    }

    fn attempt(&self, domain: &str, attempt: u32) -> Result<CheckOutcome, CheckError> {
        let response = self.client.fetch(domain)?;
        log_response(domain, attempt, &response);

        if response.status == TOO_MANY_REQUESTS {
            return Err(CheckError::RateLimited {
                status: response.status,
            });
        }

        let content_type = response.content_type.unwrap_or_default();
        if !domain::is_json_content_type(&content_type) {
            return Err(CheckError::InvalidContentType {
                content_type,
                body: response.body,
            });
        }

        let payload = match domain::parse_payload(&response.body) {
            Ok(payload) => payload,
            Err(source) => {
                return Err(CheckError::MalformedJson {
                    source,
                    body: response.body,
                })
            }
        };

        let dangerous = domain::looks_dangerous(&payload)
            .map_err(|e| CheckError::Unexpected(format!("failed to serialize payload: {}", e)))?;

        if dangerous {
            info!(action = "classify", component = "checker", domain, outcome = "dangerous", "Domain {} flagged as dangerous", domain);
            println!("Domain {} flagged as dangerous", domain);
            Ok(CheckOutcome::Dangerous)
        } else {
            info!(action = "classify", component = "checker", domain, outcome = "safe", "Domain {} is safe", domain);
            println!("Domain {} is safe", domain);
            Ok(CheckOutcome::Safe)
        }
    }

    fn report_retry(&self, domain: &str, attempt: u32, err: &CheckError) {
        let max_attempts = self.policy.max_attempts;
        let delay_secs = self.policy.delay.as_secs();
        match err {
            CheckError::RateLimited { .. } => {
                warn!(action = "retry", component = "checker", domain, attempt, max_attempts,
                    "Rate limit hit for {} (HTTP 429). Retrying after {} seconds (Attempt {}/{}).",
                    domain, delay_secs, attempt, max_attempts);
                println!(
                    "Rate limit hit for {}. Retrying after {} seconds (Attempt {}/{}).",
                    domain, delay_secs, attempt, max_attempts
                );
            }
            CheckError::TransientTransport(message) => {
                warn!(action = "retry", component = "checker", domain, attempt, max_attempts, error = %message,
                    "SSL Error for {}: {}. Retrying after {} seconds (Attempt {}/{}).",
                    domain, message, delay_secs, attempt, max_attempts);
                println!(
                    "SSL Error for {}: {}. Retrying after {} seconds (Attempt {}/{}).",
                    domain, message, delay_secs, attempt, max_attempts
                );
            }
            other => {
                warn!(action = "retry", component = "checker", domain, attempt, max_attempts, error = %other,
                    "Retrying {} after {} seconds (Attempt {}/{}).",
                    domain, delay_secs, attempt, max_attempts);
            }
        }
    }
}

fn log_response(domain: &str, attempt: u32, response: &ReputationResponse) {
    info!(action = "response", component = "checker", domain, attempt, "Domain: {} (Attempt {})", domain, attempt);
    info!(action = "response", component = "checker", domain, status = response.status, "Response Status Code: {}", response.status);
    info!(action = "response", component = "checker", domain, "Response Headers: {}", response.headers);
    info!(action = "response", component = "checker", domain, "Response Content: {}", response.body);
}

fn report_exhausted(domain: &str, err: &CheckError) {
    match err {
        CheckError::RateLimited { status } => {
            warn!(action = "skip", component = "checker", domain, status, "Max retries reached for {} (HTTP {}). Skipping.", domain, status);
            println!("Max retries reached for {}. Skipping.", domain);
        }
        CheckError::TransientTransport(message) => {
            error!(action = "skip", component = "checker", domain, error = %message, "Max retries reached for {} (SSL Error): {}", domain, message);
            println!("Max retries reached for {} (SSL Error): {}", domain, message);
        }
        other => {
            error!(action = "skip", component = "checker", domain, error = %other, "Max retries reached for {}: {}", domain, other);
            println!("Max retries reached for {}: {}", domain, other);
        }
    }
}

fn report_failure(domain: &str, err: &CheckError) {
    match err {
        CheckError::InvalidContentType { content_type, body } => {
            error!(action = "validate", component = "checker", domain, content_type = %content_type, "Invalid Content-Type for {}: {}", domain, content_type);
            error!(action = "validate", component = "checker", domain, "Response Content: {}", body);
            println!("Invalid response for {}: Content-Type is {}", domain, content_type);
        }
        CheckError::MalformedJson { source, body } => {
            error!(action = "parse", component = "checker", domain, error = %source, "JSON Decode Error for {}: {}", domain, source);
            error!(action = "parse", component = "checker", domain, "Response Content: {}", body);
            println!("Error decoding JSON for {}: {}", domain, source);
        }
        CheckError::Request(message) => {
            error!(action = "request", component = "checker", domain, error = %message, "Request Error for {}: {}", domain, message);
            println!("Error checking {}: {}", domain, message);
        }
        _ => {
            error!(action = "check", component = "checker", domain, error = %err, "Unexpected Error for {}: {}", domain, err);
            println!("Unexpected error for {}: {}", domain, err);
        }
    }
}
