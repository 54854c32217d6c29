use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Terminal classification of one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Dangerous,
    Safe,
    /// Every attempt hit a retryable failure.
    Skipped,
    /// Unusable response or non-retryable failure. Not recorded in either list.
    Invalid,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckOutcome::Dangerous => "dangerous",
            CheckOutcome::Safe => "safe",
            CheckOutcome::Skipped => "skipped",
            CheckOutcome::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Accumulators mutated by the checker during a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub dangerous: Vec<String>,
    pub skipped: Vec<String>,
    pub safe: usize,
    pub invalid: usize,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, domain: &str, outcome: CheckOutcome) {
        match outcome {
            CheckOutcome::Dangerous => self.dangerous.push(domain.to_string()),
            CheckOutcome::Skipped => self.skipped.push(domain.to_string()),
            CheckOutcome::Safe => self.safe += 1,
            CheckOutcome::Invalid => self.invalid += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.dangerous.len() + self.skipped.len() + self.safe + self.invalid
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub tally: RunTally,
    pub domains_checked: usize,
    pub started_at: String,
    pub duration: Duration,
}
