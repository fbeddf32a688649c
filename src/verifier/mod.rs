//! Tiered e-mail existence checks and the verdict rule built on them.
//!
//! [`Verifier::verify`] runs the checks mandated by a [`Mode`] in a fixed
//! order, short-circuiting on the first tier-1/tier-2 check that does not
//! pass. When MX passes under [`Mode::UltraAdvanced`], all five tier-3
//! checks run and are recorded regardless of each other's outcome.
//! [`decide`] reduces the recorded outcomes to a single [`Verdict`].
//!
//! Network failures never escape as errors: every DNS or SMTP problem is
//! recorded as [`CheckOutcome::Failed`] or [`CheckOutcome::Inconclusive`].
//! The verifier holds no mutable state and can be called from several
//! threads at once; bounding concurrency is the caller's job.

mod error;
mod types;

pub use error::{ModeParseError, VerifyError};
pub use types::{CheckKind, CheckOutcome, CheckResults, Failure, Mode, Verdict, Verification};

use tracing::{debug, warn};
use trust_dns_resolver::Resolver;

use crate::auth::{DEFAULT_DKIM_SELECTORS, check_dkim, check_dmarc, check_spf};
use crate::disposable::DisposableDomains;
use crate::dns::{DnsError, LookupDns, MxRecord, primary_exchange, system_resolver};
use crate::smtp::{SmtpHandshake, SmtpProbe, check_smtp};
use crate::validator::{check_format, domain_part, normalize_domain};

pub(crate) const INVALID_FORMAT: &str = "Invalid format";
pub(crate) const INVALID_DOMAIN: &str = "Invalid domain";
pub(crate) const NO_MX: &str = "No MX records";
pub(crate) const DISPOSABLE: &str = "Disposable domain";

pub struct Verifier<R = Resolver, P = SmtpHandshake> {
    resolver: R,
    smtp: P,
    disposable: DisposableDomains,
    dkim_selectors: Vec<String>,
}

impl Verifier {
    /// Production verifier: system resolver, port-25 handshake with a 5 s
    /// timeout, built-in disposable list, default DKIM selectors.
    pub fn from_system_conf() -> Result<Self, VerifyError> {
        Ok(Self::new(system_resolver()?, SmtpHandshake::default()))
    }
}

impl<R, P> Verifier<R, P>
where
    R: LookupDns,
    P: SmtpProbe,
{
    pub fn new(resolver: R, smtp: P) -> Self {
        Self {
            resolver,
            smtp,
            disposable: DisposableDomains::builtin(),
            dkim_selectors: DEFAULT_DKIM_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_disposable_domains(mut self, disposable: DisposableDomains) -> Self {
        self.disposable = disposable;
        self
    }

    /// Replaces the probed DKIM selectors. Blank entries are ignored and an
    /// empty result keeps the current list.
    pub fn with_dkim_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for selector in selectors {
            let trimmed = selector.as_ref().trim().trim_end_matches('.');
            if trimmed.is_empty() {
                continue;
            }
            let lower = trimmed.to_ascii_lowercase();
            if !normalized.contains(&lower) {
                normalized.push(lower);
            }
        }
        if !normalized.is_empty() {
            self.dkim_selectors = normalized;
        }
        self
    }

    pub fn disposable_domains(&self) -> &DisposableDomains {
        &self.disposable
    }

    pub fn dkim_selectors(&self) -> &[String] {
        &self.dkim_selectors
    }

    /// Runs the checks `mode` mandates against `email`.
    pub fn verify(&self, email: &str, mode: Mode) -> CheckResults {
        let mut results = CheckResults::new();
        let email = email.trim();

        let format = check_format(email);
        if !format.ok {
            let reason = format!("{INVALID_FORMAT}: {}", format.reasons.join("; "));
            record(&mut results, email, CheckKind::Format, CheckOutcome::Failed(reason));
            return results;
        }
        record(&mut results, email, CheckKind::Format, CheckOutcome::Passed);

        let ascii_domain = match normalize_domain(domain_part(email)) {
            Ok(ascii) => ascii,
            Err(_) => {
                let outcome = CheckOutcome::Failed(format!("{INVALID_DOMAIN}: IDNA conversion failed"));
                record(&mut results, email, CheckKind::Domain, outcome);
                return results;
            }
        };

        let domain = dns_outcome(self.resolver.lookup_a(&ascii_domain), INVALID_DOMAIN).0;
        if !record(&mut results, email, CheckKind::Domain, domain) || !mode.includes(CheckKind::Mx)
        {
            return results;
        }

        let (mx, mx_records) = dns_outcome(self.resolver.lookup_mx(&ascii_domain), NO_MX);
        if !record(&mut results, email, CheckKind::Mx, mx) || !mode.includes(CheckKind::Spf) {
            return results;
        }

        let spf = check_spf(&self.resolver, &ascii_domain);
        record(&mut results, email, CheckKind::Spf, spf);

        let dmarc = check_dmarc(&self.resolver, &ascii_domain);
        record(&mut results, email, CheckKind::Dmarc, dmarc);

        let dkim = check_dkim(&self.resolver, &ascii_domain, &self.dkim_selectors);
        record(&mut results, email, CheckKind::Dkim, dkim);

        let disposable = if self.disposable.contains(&ascii_domain) {
            CheckOutcome::Failed(DISPOSABLE.to_string())
        } else {
            CheckOutcome::Passed
        };
        record(&mut results, email, CheckKind::DisposableDomain, disposable);

        let smtp = self.smtp_outcome(&mx_records);
        record(&mut results, email, CheckKind::SmtpServer, smtp);

        results
    }

    /// [`verify`](Self::verify) followed by [`decide`].
    pub fn check(&self, email: &str, mode: Mode) -> Verification {
        let results = self.verify(email, mode);
        let verdict = decide(&results, mode);
        Verification {
            email: email.trim().to_string(),
            mode,
            results,
            verdict,
        }
    }

    fn smtp_outcome(&self, mx_records: &[MxRecord]) -> CheckOutcome {
        match primary_exchange(mx_records) {
            Some(primary) if !primary.exchange.is_empty() => check_smtp(&self.smtp, &primary.exchange),
            // null MX ("0 .") or nothing to dial
            _ => CheckOutcome::Failed(crate::smtp::NO_SMTP.to_string()),
        }
    }
}

/// Reduces `results` to a verdict for `mode`.
///
/// The first tier-1/tier-2 check that did not pass decides alone. Under
/// [`Mode::UltraAdvanced`] every tier-3 check that did not pass is listed,
/// in result order. A mandated check missing from `results` counts as a
/// failure.
pub fn decide(results: &CheckResults, mode: Mode) -> Verdict {
    for check in mode.checks().filter(|check| check.tier() < 3) {
        match results.get(check) {
            Some(outcome) if outcome.is_passed() => {}
            Some(outcome) => return Verdict::Invalid(vec![Failure::from_outcome(check, outcome)]),
            None => return Verdict::Invalid(vec![Failure::not_checked(check)]),
        }
    }

    let mut failures: Vec<Failure> = results
        .iter()
        .filter(|(check, outcome)| check.tier() == 3 && mode.includes(*check) && !outcome.is_passed())
        .map(|(check, outcome)| Failure::from_outcome(check, outcome))
        .collect();

    failures.extend(
        mode.checks()
            .filter(|check| check.tier() == 3 && !results.contains(*check))
            .map(Failure::not_checked),
    );

    if failures.is_empty() {
        Verdict::Valid
    } else {
        Verdict::Invalid(failures)
    }
}

/// Logs and stores one outcome; returns whether it passed.
fn record(results: &mut CheckResults, email: &str, check: CheckKind, outcome: CheckOutcome) -> bool {
    let passed = outcome.is_passed();
    if outcome.is_inconclusive() {
        warn!(%email, %check, outcome = %outcome, "check inconclusive");
    } else {
        debug!(%email, %check, outcome = %outcome, "check done");
    }
    results.record(check, outcome);
    passed
}

fn dns_outcome<T>(lookup: Result<Vec<T>, DnsError>, failure: &str) -> (CheckOutcome, Vec<T>) {
    match lookup {
        Ok(records) if !records.is_empty() => (CheckOutcome::Passed, records),
        Ok(_) => (CheckOutcome::Failed(failure.to_string()), Vec::new()),
        Err(err) if err.is_no_records() => (CheckOutcome::Failed(failure.to_string()), Vec::new()),
        Err(err) => (
            CheckOutcome::Inconclusive(format!("{failure}: {err}")),
            Vec::new(),
        ),
    }
}
