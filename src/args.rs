use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "dangerscan",
    about = "Check domains from domains.txt against Google Safe Browsing and save the dangerous ones",
    version,
    long_about = None
)]
pub struct Args {
    /// Mirror log records to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
