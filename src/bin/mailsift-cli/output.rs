use anyhow::{Result, bail};

use mailsift::{DirectorySummary, Verification};

pub fn write_reports(rows: &[Verification], format: &str, details: bool) -> Result<()> {
    match format {
        "human" => {
            write_human(rows, details);
            Ok(())
        }
        "json" => write_json(rows),
        "ndjson" => write_ndjson(rows),
        other => bail!("unknown --format '{other}', use: human|json|ndjson"),
    }
}

pub fn any_invalid(rows: &[Verification]) -> bool {
    rows.iter().any(|row| !row.verdict.is_valid())
}

fn write_human(rows: &[Verification], details: bool) {
    for row in rows {
        if row.verdict.is_valid() {
            println!("[OK]      {} ({})", row.email, row.mode);
        } else {
            println!("[INVALID] {} ({}) :: {}", row.email, row.mode, row.verdict);
        }

        if details {
            for (check, outcome) in row.results.iter() {
                println!("        {check}: {outcome}");
            }
        }
    }
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[Verification]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[Verification]) -> Result<()> {
    bail!("format=json requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[Verification]) -> Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[Verification]) -> Result<()> {
    bail!("format=ndjson requires the 'with-serde' feature")
}

pub fn print_directory_summary(summary: &DirectorySummary) {
    for path in &summary.outputs {
        println!("wrote {}", path.display());
    }
    let totals = &summary.totals;
    println!(
        "files: {} processed, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    println!(
        "rows: {}, candidates: {}, excluded: {}, valid: {}, invalid: {}",
        totals.rows, totals.candidates, totals.excluded, totals.valid, totals.invalid
    );
}
