//! CSV batch verification.
//!
//! [`verify_csv`] rewrites one table: the email column of every row is
//! split into candidates, excluded words are dropped, the rest are
//! verified on a bounded pool of scoped threads and only valid addresses
//! are written back. [`run_directory`] does the same for every `*.csv`
//! in a folder.

mod error;
mod pool;

pub use error::BatchError;

use std::io::{Read, Write};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{DEFAULT_EMAIL_COLUMN, DEFAULT_WORKERS, PipelineConfig};
use crate::dns::LookupDns;
use crate::extract::Exclusions;
use crate::smtp::SmtpProbe;
use crate::verifier::{Mode, Verifier, VerifyError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub mode: Mode,
    pub email_column: String,
    pub workers: usize,
    pub exclusions: Exclusions,
    /// Only the first `limit` data rows are read, verified and written.
    pub limit: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Advanced,
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
            workers: DEFAULT_WORKERS,
            exclusions: Exclusions::default(),
            limit: None,
        }
    }
}

impl BatchOptions {
    /// Options taken from `config`, exclusion lists included.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, BatchError> {
        Ok(Self {
            mode: config.mode,
            email_column: config.email_column.clone(),
            workers: config.workers,
            exclusions: config.load_exclusions()?,
            limit: config.limit,
        })
    }
}

/// Counters for one table, or the sum over several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct BatchSummary {
    pub rows: usize,
    /// Non-empty cell entries, excluded ones included.
    pub candidates: usize,
    pub excluded: usize,
    pub valid: usize,
    pub invalid: usize,
}

impl AddAssign for BatchSummary {
    fn add_assign(&mut self, other: Self) {
        self.rows += other.rows;
        self.candidates += other.candidates;
        self.excluded += other.excluded;
        self.valid += other.valid;
        self.invalid += other.invalid;
    }
}

/// Verifies the email column of the CSV read from `input` and writes the
/// filtered table to `output`.
///
/// Every other column is copied untouched. `make_verifier` is called once
/// per worker thread, and only when there is something to verify.
pub fn verify_csv<Rd, W, F, R, P>(
    input: Rd,
    output: W,
    options: &BatchOptions,
    make_verifier: F,
) -> Result<BatchSummary, BatchError>
where
    Rd: Read,
    W: Write,
    F: Fn() -> Result<Verifier<R, P>, VerifyError> + Sync,
    R: LookupDns,
    P: SmtpProbe,
{
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let column = find_column(&headers, &options.email_column)?;

    let mut rows = Vec::new();
    for record in reader.records().take(options.limit.unwrap_or(usize::MAX)) {
        rows.push(record?);
    }

    let mut summary = BatchSummary {
        rows: rows.len(),
        ..BatchSummary::default()
    };

    // candidate emails, flattened; `spans[i]` indexes row i's slice of it
    let mut emails: Vec<String> = Vec::new();
    let mut spans = Vec::with_capacity(rows.len());
    for row in &rows {
        let start = emails.len();
        for candidate in split_cell(row.get(column).unwrap_or_default()) {
            summary.candidates += 1;
            if options.exclusions.is_excluded(candidate) {
                debug!(email = candidate, "excluded");
                summary.excluded += 1;
            } else {
                emails.push(candidate.to_string());
            }
        }
        spans.push(start..emails.len());
    }

    let mode = options.mode;
    let valid = pool::map_bounded(&emails, options.workers, make_verifier, |verifier, email| {
        let verification = verifier.check(email, mode);
        debug!(%email, verdict = %verification.verdict, "verified");
        verification.verdict.is_valid()
    })?;
    summary.valid = valid.iter().filter(|ok| **ok).count();
    summary.invalid = valid.len() - summary.valid;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(output);
    writer.write_record(&headers)?;
    for (row, span) in rows.iter().zip(spans) {
        let kept: Vec<&str> = span
            .filter(|idx| valid[*idx])
            .map(|idx| emails[idx].as_str())
            .collect();
        let joined = kept.join(", ");
        let fields = row
            .iter()
            .enumerate()
            .map(|(idx, field)| if idx == column { joined.as_str() } else { field });
        writer.write_record(fields)?;
    }
    writer.flush()?;

    Ok(summary)
}

/// Output file name for `input` verified under `mode`:
/// `<stem>_verified_<mode>.csv`.
pub fn output_file_name(input: &Path, mode: Mode) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}_verified_{}.csv", mode.as_str())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySummary {
    pub processed: usize,
    /// Empty inputs and inputs whose output already exists.
    pub skipped: usize,
    pub failed: usize,
    pub totals: BatchSummary,
    pub outputs: Vec<PathBuf>,
}

/// Verifies every `*.csv` in `config.input_dir` into `config.output_dir`.
///
/// Files are visited in name order. A file that cannot be read or lacks
/// the email column is logged and counted in
/// [`failed`](DirectorySummary::failed); the run goes on. Only a missing
/// input folder, an unusable output folder or bad exclusion lists abort.
pub fn run_directory<F, R, P>(
    config: &PipelineConfig,
    make_verifier: F,
) -> Result<DirectorySummary, BatchError>
where
    F: Fn() -> Result<Verifier<R, P>, VerifyError> + Sync,
    R: LookupDns,
    P: SmtpProbe,
{
    let options = BatchOptions::from_config(config)?;
    let inputs = list_csv_files(&config.input_dir)?;
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|source| BatchError::io(&config.output_dir, source))?;

    info!(
        files = inputs.len(),
        input = %config.input_dir.display(),
        mode = %options.mode,
        "batch run started"
    );

    let mut summary = DirectorySummary::default();
    for input in inputs {
        let output = config.output_dir.join(output_file_name(&input, options.mode));
        if output.exists() {
            warn!(file = %input.display(), output = %output.display(), "already verified, skipping");
            summary.skipped += 1;
            continue;
        }

        match verify_file(&input, &output, &options, &make_verifier) {
            Ok(Some(counts)) => {
                info!(
                    file = %input.display(),
                    rows = counts.rows,
                    valid = counts.valid,
                    invalid = counts.invalid,
                    excluded = counts.excluded,
                    "file verified"
                );
                summary.processed += 1;
                summary.totals += counts;
                summary.outputs.push(output);
            }
            Ok(None) => {
                warn!(file = %input.display(), "empty file, skipping");
                summary.skipped += 1;
            }
            Err(err) => {
                warn!(file = %input.display(), error = %err, "file failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        valid = summary.totals.valid,
        "batch run finished"
    );
    Ok(summary)
}

/// `Ok(None)` for an empty input.
fn verify_file<F, R, P>(
    input: &Path,
    output: &Path,
    options: &BatchOptions,
    make_verifier: &F,
) -> Result<Option<BatchSummary>, BatchError>
where
    F: Fn() -> Result<Verifier<R, P>, VerifyError> + Sync,
    R: LookupDns,
    P: SmtpProbe,
{
    let data = std::fs::read(input).map_err(|source| BatchError::io(input, source))?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let mut buf = Vec::new();
    let counts = verify_csv(data.as_slice(), &mut buf, options, make_verifier)?;
    write_all_atomically(output, &buf)?;
    Ok(Some(counts))
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::MissingInputDir {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|source| BatchError::io(dir, source))? {
        let path = entry.map_err(|source| BatchError::io(dir, source))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn find_column(headers: &csv::StringRecord, column: &str) -> Result<usize, BatchError> {
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| BatchError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        })
}

fn split_cell(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn write_all_atomically(path: &Path, bytes: &[u8]) -> Result<(), BatchError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut f = std::fs::File::create(&tmp).map_err(|source| BatchError::io(&tmp, source))?;
        f.write_all(bytes).map_err(|source| BatchError::io(&tmp, source))?;
        f.sync_all().map_err(|source| BatchError::io(&tmp, source))?;
    }
    std::fs::rename(&tmp, path).map_err(|source| BatchError::io(path, source))?;
    Ok(())
}

#[cfg(test)]
mod tests;
