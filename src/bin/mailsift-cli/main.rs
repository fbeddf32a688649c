mod args;
mod output;

use std::io::{self, BufRead, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use mailsift::{Exclusions, PipelineConfig, extract_candidates, run_directory};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Check {
            emails,
            stdin,
            mode,
            format,
            details,
            dkim_selectors,
        } => {
            let mode = mode.unwrap_or(config.mode);
            let verifier = config
                .system_verifier()
                .context("cannot set up the DNS resolver")?
                .with_dkim_selectors(&dkim_selectors);

            let mut inputs = emails;
            if stdin {
                for line in io::stdin().lock().lines() {
                    let line = line.context("read stdin")?;
                    if !line.trim().is_empty() {
                        inputs.push(line);
                    }
                }
            }
            if inputs.is_empty() {
                bail!("no address given, pass some or use --stdin");
            }

            let rows: Vec<_> = inputs.iter().map(|email| verifier.check(email, mode)).collect();
            output::write_reports(&rows, &format, details)?;

            // exit codes: 0 all valid, 2 some invalid, 1 fatal
            if output::any_invalid(&rows) {
                std::process::exit(2);
            }
        }
        Commands::Extract {
            exclude,
            exclusions_dir,
        } => {
            if exclusions_dir.is_some() {
                config.exclusions_dir = exclusions_dir;
            }
            let mut exclusions: Exclusions = config.load_exclusions()?;
            exclusions.extend(&exclude);

            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("read stdin")?;
            for candidate in extract_candidates(&text) {
                if !exclusions.is_excluded(&candidate) {
                    println!("{candidate}");
                }
            }
        }
        Commands::Batch {
            input,
            output,
            mode,
            workers,
            column,
            limit,
        } => {
            if let Some(input) = input {
                config.input_dir = input;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(workers) = workers {
                config.workers = workers;
            }
            if let Some(column) = column {
                config.email_column = column;
            }
            if limit.is_some() {
                config.limit = limit;
            }
            config.validate()?;

            let summary = run_directory(&config, || config.system_verifier())?;
            output::print_directory_summary(&summary);
            if summary.failed > 0 {
                bail!("{} file(s) could not be verified", summary.failed);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => Ok(PipelineConfig::load(path)?),
        None => Ok(PipelineConfig::default()),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mailsift={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
