use std::fmt;
use std::str::FromStr;

use super::ModeParseError;

/// Thoroughness tier requested for a batch. Each level runs a strict
/// superset of the checks of the level below it.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize), serde(rename_all = "kebab-case"))]
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String")]
pub enum Mode {
    /// Format + domain `A` record.
    Normal,
    /// Adds the MX lookup.
    Advanced,
    /// Adds SPF, DMARC, DKIM, disposable-domain and SMTP liveness.
    UltraAdvanced,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Advanced, Mode::UltraAdvanced];

    /// Accepted spellings, canonical names first.
    pub const ACCEPTED: [&'static str; 5] = [
        "normal",
        "advanced",
        "ultra-advanced",
        "avanzado",
        "ultra-avanzado",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Advanced => "advanced",
            Mode::UltraAdvanced => "ultra-advanced",
        }
    }

    pub fn includes(self, check: CheckKind) -> bool {
        self >= check.min_mode()
    }

    /// Checks this mode may execute, in evaluation order.
    pub fn checks(self) -> impl Iterator<Item = CheckKind> {
        CheckKind::ALL
            .into_iter()
            .filter(move |check| self.includes(*check))
    }
}

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Mode::Normal),
            "advanced" | "avanzado" => Ok(Mode::Advanced),
            "ultra-advanced" | "ultra-avanzado" => Ok(Mode::UltraAdvanced),
            other => Err(ModeParseError::new(other)),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = ModeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckKind {
    Format,
    Domain,
    Mx,
    Spf,
    Dmarc,
    Dkim,
    DisposableDomain,
    SmtpServer,
}

impl CheckKind {
    /// Fixed evaluation order.
    pub const ALL: [CheckKind; 8] = [
        CheckKind::Format,
        CheckKind::Domain,
        CheckKind::Mx,
        CheckKind::Spf,
        CheckKind::Dmarc,
        CheckKind::Dkim,
        CheckKind::DisposableDomain,
        CheckKind::SmtpServer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::Format => "Format",
            CheckKind::Domain => "Domain",
            CheckKind::Mx => "MX",
            CheckKind::Spf => "SPF",
            CheckKind::Dmarc => "DMARC",
            CheckKind::Dkim => "DKIM",
            CheckKind::DisposableDomain => "DisposableDomain",
            CheckKind::SmtpServer => "SMTPServer",
        }
    }

    pub fn tier(self) -> u8 {
        match self {
            CheckKind::Format | CheckKind::Domain => 1,
            CheckKind::Mx => 2,
            _ => 3,
        }
    }

    pub fn min_mode(self) -> Mode {
        match self.tier() {
            1 => Mode::Normal,
            2 => Mode::Advanced,
            _ => Mode::UltraAdvanced,
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one check.
///
/// `Failed` is a confirmed negative (record absent, domain listed, server
/// refused). `Inconclusive` means the probe could not tell (timeouts,
/// SERVFAIL, broken replies). Only `Passed` counts towards a valid verdict.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed(String),
    Inconclusive(String),
}

impl CheckOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Self::Inconclusive(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed(reason) | Self::Inconclusive(reason) => Some(reason),
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason().unwrap_or("Valid"))
    }
}

/// Executed checks in evaluation order, at most one entry per check.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResults {
    entries: Vec<(CheckKind, CheckOutcome)>,
}

impl CheckResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `outcome` for `check`, replacing an earlier entry in place.
    pub fn record(&mut self, check: CheckKind, outcome: CheckOutcome) {
        match self.entries.iter_mut().find(|(kind, _)| *kind == check) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((check, outcome)),
        }
    }

    pub fn get(&self, check: CheckKind) -> Option<&CheckOutcome> {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == check)
            .map(|(_, outcome)| outcome)
    }

    pub fn contains(&self, check: CheckKind) -> bool {
        self.get(check).is_some()
    }

    pub fn passed(&self, check: CheckKind) -> bool {
        self.get(check).is_some_and(CheckOutcome::is_passed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckKind, &CheckOutcome)> {
        self.entries.iter().map(|(kind, outcome)| (*kind, outcome))
    }

    pub fn executed(&self) -> Vec<CheckKind> {
        self.entries.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A check that kept the verdict from being `Valid`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub check: CheckKind,
    pub reason: String,
    pub inconclusive: bool,
}

impl Failure {
    pub(crate) fn from_outcome(check: CheckKind, outcome: &CheckOutcome) -> Self {
        Self {
            check,
            reason: outcome.reason().unwrap_or_default().to_string(),
            inconclusive: outcome.is_inconclusive(),
        }
    }

    pub(crate) fn not_checked(check: CheckKind) -> Self {
        Self {
            check,
            reason: "Not checked".to_string(),
            inconclusive: true,
        }
    }
}

impl fmt::Display for Failure {
    /// Tier-1/2 failures read as their reason alone; tier-3 failures are
    /// prefixed with the check name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.check.tier() < 3 {
            f.write_str(&self.reason)
        } else {
            write!(f, "{}: {}", self.check, self.reason)
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Vec<Failure>),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failures(&self) -> &[Failure] {
        match self {
            Self::Valid => &[],
            Self::Invalid(failures) => failures,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("Valid"),
            Self::Invalid(failures) => {
                for (idx, failure) in failures.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{failure}")?;
                }
                Ok(())
            }
        }
    }
}

/// One address, the mode it was checked under, and what came out.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub email: String,
    pub mode: Mode,
    pub results: CheckResults,
    pub verdict: Verdict,
}
