use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use mailsift::Mode;

#[derive(Parser)]
#[command(name = "mailsift-cli", version, about = "Tiered e-mail verification")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// pipeline config (TOML); flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// -v for info, -vv for debug (RUST_LOG wins when set)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify addresses given as arguments or on stdin (one per line)
    Check {
        emails: Vec<String>,
        /// read addresses from stdin
        #[arg(long)]
        stdin: bool,
        /// normal|advanced|ultra-advanced (avanzado, ultra-avanzado accepted)
        #[arg(long)]
        mode: Option<Mode>,
        /// format: human|json|ndjson
        #[arg(long, default_value = "human")]
        format: String,
        /// list every executed check, not only the verdict
        #[arg(long)]
        details: bool,
        /// DKIM selector to probe (repeatable, replaces the defaults)
        #[arg(long = "dkim-selector")]
        dkim_selectors: Vec<String>,
    },
    /// Print the addresses found in text read from stdin
    Extract {
        /// word to exclude (repeatable, added to the config exclusions)
        #[arg(long)]
        exclude: Vec<String>,
        /// folder of *.txt exclusion lists
        #[arg(long)]
        exclusions_dir: Option<PathBuf>,
    },
    /// Verify every CSV file of a folder
    Batch {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        mode: Option<Mode>,
        /// concurrent verifications
        #[arg(long)]
        workers: Option<usize>,
        /// name of the email column
        #[arg(long)]
        column: Option<String>,
        /// verify only the first N rows of each file
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
