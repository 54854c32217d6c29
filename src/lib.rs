pub mod args;
pub mod checker;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod retry;
pub mod runner;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use checker::DomainChecker;
pub use client::{HttpReputationClient, ReputationClient, ReputationResponse};
pub use config::CheckerConfig;
pub use error::CheckError;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use runner::{print_summary, run_checks, write_dangerous_domains};
pub use stats::{CheckOutcome, RunReport, RunTally};
