use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::error;

use dangerscan::config::{self, CheckerConfig};
use dangerscan::{
    domain, print_summary, run_checks, utils, write_dangerous_domains, Args, DomainChecker,
    HttpReputationClient, RetryPolicy, ThreadSleeper,
};

fn run(config: &CheckerConfig) -> Result<()> {
    let domains = domain::read_domains(Path::new(config::DOMAINS_FILE))?;

    let client = HttpReputationClient::new(config)?;
    let checker = DomainChecker::new(client, ThreadSleeper, RetryPolicy::from_config(config));

    let report = run_checks(&checker, &domains, config.throttle_delay);

    write_dangerous_domains(Path::new(config::DANGEROUS_FILE), &report.tally.dangerous)?;
    print_summary(&report, config::DANGEROUS_FILE);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = utils::setup_logging(Path::new(config::LOG_FILE), args.verbose)?;

    if let Err(e) = run(&CheckerConfig::default()) {
        error!(action = "abort", component = "run", error = %e, "Run failed");
        return Err(e);
    }
    Ok(())
}
