use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::checker::DomainChecker;
use crate::client::ReputationClient;
use crate::retry::Sleeper;
use crate::stats::{RunReport, RunTally};

/// Checks every domain in order, pausing `throttle` after each one.
pub fn run_checks<C, S>(
    checker: &DomainChecker<C, S>,
    domains: &[String],
    throttle: Duration,
) -> RunReport
where
    C: ReputationClient,
    S: Sleeper,
{
    let started_at = Utc::now().to_rfc3339();
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "run",
        domain_count = domains.len(),
        started_at = %started_at,
        "Starting domain checks"
    );

    let mut tally = RunTally::new();
    for domain in domains {
        checker.check(domain, &mut tally);
        checker.sleeper().sleep(throttle);
    }

    let duration = start_time.elapsed();
    info!(
        action = "complete",
        component = "run",
        domains_checked = tally.total(),
        dangerous = tally.dangerous.len(),
        skipped = tally.skipped.len(),
        safe = tally.safe,
        invalid = tally.invalid,
        duration_ms = duration.as_millis(),
        "Domain checks completed"
    );

    RunReport {
        domains_checked: tally.total(),
        tally,
        started_at,
        duration,
    }
}

/// Overwrites `path` with one domain per line.
pub fn write_dangerous_domains(path: &Path, domains: &[String]) -> Result<()> {
    let mut content = String::new();
    for domain in domains {
        content.push_str(domain);
        content.push('\n');
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write dangerous domains to {:?}", path))?;
    info!(action = "write", component = "results_file", file_path = ?path, domain_count = domains.len(), "Wrote dangerous domains");
    Ok(())
}

pub fn summary_lines(report: &RunReport, results_file: &str) -> [String; 2] {
    [
        format!(
            "Found {} dangerous domains. Results saved to {}",
            report.tally.dangerous.len(),
            results_file
        ),
        format!(
            "Skipped {} domains due to errors: {}",
            report.tally.skipped.len(),
            quoted_list(&report.tally.skipped)
        ),
    ]
}

/// Renders `['a.com', 'b.com']`, the list format the summary has always used.
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn print_summary(report: &RunReport, results_file: &str) {
    if let Ok(json) = serde_json::to_string(report) {
        debug!(action = "summary", component = "run", report = %json, "Run report");
    }
    for line in summary_lines(report, results_file) {
        info!(action = "summary", component = "run", "{}", line);
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(dangerous: &[&str], skipped: &[&str]) -> RunReport {
        RunReport {
            tally: RunTally {
                dangerous: dangerous.iter().map(|d| d.to_string()).collect(),
                skipped: skipped.iter().map(|d| d.to_string()).collect(),
                safe: 0,
                invalid: 0,
            },
            domains_checked: dangerous.len() + skipped.len(),
            started_at: String::new(),
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_summary_lines() {
        let [found, skipped] = summary_lines(&report(&["a.com"], &["b.com", "c.com"]), "dangerdomains.txt");
        assert_eq!(found, "Found 1 dangerous domains. Results saved to dangerdomains.txt");
        assert_eq!(skipped, "Skipped 2 domains due to errors: ['b.com', 'c.com']");
    }

    #[test]
    fn test_summary_lines_with_nothing_skipped() {
        let [found, skipped] = summary_lines(&report(&[], &[]), "dangerdomains.txt");
        assert_eq!(found, "Found 0 dangerous domains. Results saved to dangerdomains.txt");
        assert_eq!(skipped, "Skipped 0 domains due to errors: []");
    }

    #[test]
    fn test_write_dangerous_domains_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dangerdomains.txt");
        fs::write(&path, "stale.com\nolder.com\nold.com\n").unwrap();

        write_dangerous_domains(&path, &["a.com".to_string(), "b.com".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a.com\nb.com\n");

        write_dangerous_domains(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
