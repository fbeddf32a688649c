use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{BatchError, BatchOptions, BatchSummary, output_file_name, run_directory, verify_csv};
use crate::config::PipelineConfig;
use crate::dns::DnsError;
use crate::dns::tests::StubDns;
use crate::extract::Exclusions;
use crate::smtp::tests::StubSmtp;
use crate::verifier::{Mode, Verifier, VerifyError};

fn stub_verifier() -> Result<Verifier<StubDns, StubSmtp>, VerifyError> {
    let dns = StubDns::new().with_a("shop.es").with_a("sentry.io").with_a("mailinator.com");
    Ok(Verifier::new(dns, StubSmtp::new()))
}

fn normal(workers: usize) -> BatchOptions {
    BatchOptions {
        mode: Mode::Normal,
        workers,
        exclusions: Exclusions::new(["sentry"]),
        ..BatchOptions::default()
    }
}

fn run(input: &str, options: &BatchOptions) -> (String, BatchSummary) {
    let mut out = Vec::new();
    let summary = verify_csv(input.as_bytes(), &mut out, options, stub_verifier).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn keeps_only_valid_addresses() {
    let input = "\
name,email,city
Shop,\"info@shop.es, sales@nowhere.test\",Granada
Blog,,Madrid
Spam,abc@sentry.io,Sevilla
";
    let (out, summary) = run(input, &normal(2));
    assert_eq!(
        out,
        "\
name,email,city
Shop,info@shop.es,Granada
Blog,,Madrid
Spam,,Sevilla
"
    );
    assert_eq!(
        summary,
        BatchSummary {
            rows: 3,
            candidates: 3,
            excluded: 1,
            valid: 1,
            invalid: 1,
        }
    );
}

#[test]
fn exclusion_drops_only_the_matching_address() {
    let input = "email\n\"abc@sentry.io, info@shop.es\"\n";
    let (out, summary) = run(input, &normal(1));
    assert_eq!(out, "email\ninfo@shop.es\n");
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.valid, 1);
}

#[test]
fn joins_several_valid_addresses() {
    let input = "email\n\"a@shop.es,,  b@shop.es \"\n";
    let (out, summary) = run(input, &normal(1));
    assert_eq!(out, "email\n\"a@shop.es, b@shop.es\"\n");
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.valid, 2);
}

#[test]
fn mode_decides_validity() {
    // the stub has no MX for it, so only normal mode accepts it
    let input = "email\nx@mailinator.com\n";
    let (normal_out, _) = run(input, &normal(1));
    assert_eq!(normal_out, "email\nx@mailinator.com\n");

    let ultra = BatchOptions {
        mode: Mode::UltraAdvanced,
        ..normal(1)
    };
    let (ultra_out, summary) = run(input, &ultra);
    assert_eq!(ultra_out, "email\n\"\"\n");
    assert_eq!(summary.invalid, 1);
}

#[test]
fn output_order_follows_input() {
    let mut input = String::from("id,email\n");
    let mut expected = input.clone();
    for i in 0..40 {
        let email = if i % 3 == 0 {
            format!("user{i}@gone.test")
        } else {
            format!("user{i}@shop.es")
        };
        input.push_str(&format!("{i},{email}\n"));
        let kept = if i % 3 == 0 { "" } else { email.as_str() };
        expected.push_str(&format!("{i},{kept}\n"));
    }

    let (out, summary) = run(&input, &normal(4));
    assert_eq!(out, expected);
    assert_eq!(summary.rows, 40);
    assert_eq!(summary.valid + summary.invalid, 40);
}

#[test]
fn limit_stops_after_first_rows() {
    let options = BatchOptions {
        limit: Some(2),
        ..normal(2)
    };
    let input = "id,email\n1,a@shop.es\n2,b@shop.es\n3,c@shop.es\n4,not-an-email\n";
    let (out, summary) = run(input, &options);
    assert_eq!(out, "id,email\n1,a@shop.es\n2,b@shop.es\n");
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.invalid, 0);
}

#[test]
fn limit_above_row_count_keeps_everything() {
    let options = BatchOptions {
        limit: Some(20),
        ..normal(1)
    };
    let (out, summary) = run("email\na@shop.es\n", &options);
    assert_eq!(out, "email\na@shop.es\n");
    assert_eq!(summary.rows, 1);
}

#[test]
fn custom_column_and_short_rows() {
    let options = BatchOptions {
        email_column: "correo".to_string(),
        ..normal(2)
    };
    let input = "correo,web\nhola@shop.es,shop.es\n\nbad-address\n";
    let (out, summary) = run(input, &options);
    assert_eq!(out, "correo,web\nhola@shop.es,shop.es\n\"\"\n");
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.invalid, 1);
}

#[test]
fn missing_column_lists_headers() {
    let mut out = Vec::new();
    let err = verify_csv("name,mail\nx,y@shop.es\n".as_bytes(), &mut out, &normal(1), stub_verifier)
        .unwrap_err();
    match &err {
        BatchError::MissingColumn { column, available } => {
            assert_eq!(column, "email");
            assert_eq!(available, &["name", "mail"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), "column 'email' not found (available: name, mail)");
}

#[test]
fn factory_error_is_propagated() {
    let failing = || -> Result<Verifier<StubDns, StubSmtp>, VerifyError> {
        Err(DnsError::resolver_init(std::io::Error::other("no resolv.conf")).into())
    };
    let mut out = Vec::new();
    let err = verify_csv("email\na@shop.es\n".as_bytes(), &mut out, &normal(2), failing).unwrap_err();
    assert!(matches!(err, BatchError::Verifier(_)), "{err}");
}

#[test]
fn factory_unused_without_candidates() {
    let failing = || -> Result<Verifier<StubDns, StubSmtp>, VerifyError> {
        Err(DnsError::resolver_init(std::io::Error::other("no resolv.conf")).into())
    };
    let mut out = Vec::new();
    let summary = verify_csv("email\n\n\"\"\n".as_bytes(), &mut out, &normal(2), failing).unwrap();
    assert_eq!(summary.candidates, 0);
}

#[test]
fn output_name_carries_mode() {
    let path = PathBuf::from("inputs/granada.csv");
    assert_eq!(output_file_name(&path, Mode::Advanced), "granada_verified_advanced.csv");
    assert_eq!(
        output_file_name(&path, Mode::UltraAdvanced),
        "granada_verified_ultra-advanced.csv"
    );
}

#[test]
fn directory_run_skips_and_counts() {
    let root = TempDir::new().unwrap();
    let inputs = root.path().join("in");
    let outputs = root.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::create_dir_all(&outputs).unwrap();

    fs::write(inputs.join("a.csv"), "email\ninfo@shop.es\nx@gone.test\n").unwrap();
    fs::write(inputs.join("b.csv"), "").unwrap();
    fs::write(inputs.join("c.csv"), "name,mail\nx,y@shop.es\n").unwrap();
    fs::write(inputs.join("d.csv"), "email\ninfo@shop.es\n").unwrap();
    fs::write(inputs.join("notes.txt"), "email\ninfo@shop.es\n").unwrap();
    fs::write(outputs.join("d_verified_normal.csv"), "done before").unwrap();

    let config = PipelineConfig {
        input_dir: inputs,
        output_dir: outputs.clone(),
        mode: Mode::Normal,
        workers: 2,
        ..PipelineConfig::default()
    };
    let summary = run_directory(&config, stub_verifier).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.totals.valid, 1);
    assert_eq!(summary.totals.invalid, 1);
    assert_eq!(summary.outputs, vec![outputs.join("a_verified_normal.csv")]);

    let written = fs::read_to_string(outputs.join("a_verified_normal.csv")).unwrap();
    assert_eq!(written, "email\ninfo@shop.es\n\"\"\n");
    assert_eq!(
        fs::read_to_string(outputs.join("d_verified_normal.csv")).unwrap(),
        "done before"
    );
    assert!(!outputs.join("a_verified_normal.csv.tmp").exists());
}

#[test]
fn directory_run_creates_output_dir() {
    let root = TempDir::new().unwrap();
    let inputs = root.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("list.csv"), "email\ninfo@shop.es\n").unwrap();

    let config = PipelineConfig {
        input_dir: inputs,
        output_dir: root.path().join("nested/out"),
        mode: Mode::Normal,
        ..PipelineConfig::default()
    };
    let summary = run_directory(&config, stub_verifier).unwrap();
    assert_eq!(summary.processed, 1);
    assert!(root.path().join("nested/out/list_verified_normal.csv").is_file());
}

#[test]
fn missing_input_dir_aborts() {
    let config = PipelineConfig {
        input_dir: PathBuf::from("/definitely/not/here"),
        ..PipelineConfig::default()
    };
    let err = run_directory(&config, stub_verifier).unwrap_err();
    assert!(matches!(err, BatchError::MissingInputDir { .. }), "{err}");
}
