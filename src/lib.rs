#![forbid(unsafe_code)]
//! mailsift: tiered e-mail existence verification (syntax, DNS, mail
//! authentication records, disposable domains, SMTP liveness) and a CSV
//! batch pipeline built on it.

pub mod auth;
pub mod batch;
pub mod config;
pub mod disposable;
pub mod dns;
pub mod extract;
pub mod smtp;
pub mod validator;
pub mod verifier;

pub use batch::{BatchError, BatchOptions, BatchSummary, DirectorySummary, run_directory, verify_csv};
pub use config::{ConfigError, PipelineConfig};
pub use disposable::DisposableDomains;
pub use dns::{DnsError, LookupDns, MxRecord};
pub use extract::{Exclusions, extract_candidates};
pub use smtp::{SmtpError, SmtpHandshake, SmtpProbe};
pub use validator::{FormatReport, check_format};
pub use verifier::{
    CheckKind, CheckOutcome, CheckResults, Failure, Mode, ModeParseError, Verdict, Verification,
    Verifier, VerifyError, decide,
};
