//! Pipeline configuration, read from a TOML file.
//!
//! Every field is optional in the file; missing ones fall back to
//! [`PipelineConfig::default`]. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::disposable::DisposableDomains;
use crate::dns::LookupDns;
use crate::extract::Exclusions;
use crate::smtp::SmtpProbe;
use crate::verifier::{Mode, Verifier, VerifyError};

pub const DEFAULT_EMAIL_COLUMN: &str = "email";
pub const DEFAULT_WORKERS: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot load exclusions from {path}: {source}")]
    Exclusions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("workers must be at least 1")]
    NoWorkers,
    #[error("limit must be at least 1")]
    ZeroLimit,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mode: Mode,
    pub email_column: String,
    /// Upper bound on rows verified concurrently.
    pub workers: usize,
    /// Replaces the built-in disposable list when set.
    pub disposable_domains: Option<Vec<String>>,
    pub extra_disposable_domains: Vec<String>,
    pub exclusions: Vec<String>,
    /// Folder of `*.txt` exclusion lists, merged with `exclusions`.
    pub exclusions_dir: Option<PathBuf>,
    /// Empty keeps the default probe list.
    pub dkim_selectors: Vec<String>,
    /// Rows verified per file; `None` means all of them.
    pub limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputs"),
            output_dir: PathBuf::from("outputs"),
            mode: Mode::Advanced,
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
            workers: DEFAULT_WORKERS,
            disposable_domains: None,
            extra_disposable_domains: Vec::new(),
            exclusions: Vec::new(),
            exclusions_dir: None,
            dkim_selectors: Vec::new(),
            limit: None,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.limit == Some(0) {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(())
    }

    pub fn disposable(&self) -> DisposableDomains {
        let base = match &self.disposable_domains {
            Some(domains) => DisposableDomains::from_domains(domains),
            None => DisposableDomains::builtin(),
        };
        base.extended(&self.extra_disposable_domains)
    }

    /// Applies the denylist and DKIM selectors of this config to `verifier`.
    pub fn configure<R, P>(&self, verifier: Verifier<R, P>) -> Verifier<R, P>
    where
        R: LookupDns,
        P: SmtpProbe,
    {
        verifier
            .with_disposable_domains(self.disposable())
            .with_dkim_selectors(&self.dkim_selectors)
    }

    /// Production verifier set up from this config.
    pub fn system_verifier(&self) -> Result<Verifier, VerifyError> {
        Ok(self.configure(Verifier::from_system_conf()?))
    }

    /// Inline words plus the contents of `exclusions_dir`, if any.
    pub fn load_exclusions(&self) -> Result<Exclusions, ConfigError> {
        let mut exclusions = match &self.exclusions_dir {
            Some(dir) => Exclusions::load_dir(dir).map_err(|source| ConfigError::Exclusions {
                path: dir.clone(),
                source,
            })?,
            None => Exclusions::default(),
        };
        exclusions.extend(&self.exclusions);
        Ok(exclusions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::tests::StubDns;
    use crate::smtp::tests::StubSmtp;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.mode, Mode::Advanced);
        assert_eq!(config.workers, 5);
        assert_eq!(config.email_column, "email");
    }

    #[test]
    fn full_file_parses() {
        let config = PipelineConfig::from_toml_str(
            r#"
            input_dir = "data/in"
            output_dir = "data/out"
            mode = "ultra-avanzado"
            email_column = "emails"
            workers = 8
            disposable_domains = ["throwaway.test"]
            extra_disposable_domains = ["yopmail.com"]
            exclusions = ["sentry", "wixpress"]
            dkim_selectors = ["google", "k1"]
            limit = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::UltraAdvanced);
        assert_eq!(config.workers, 8);
        assert_eq!(config.limit, Some(20));
        assert_eq!(config.input_dir, PathBuf::from("data/in"));

        let disposable = config.disposable();
        assert!(disposable.contains("throwaway.test"));
        assert!(disposable.contains("yopmail.com"));
        assert!(!disposable.contains("mailinator.com"));

        let exclusions = config.load_exclusions().unwrap();
        assert!(exclusions.is_excluded("x@sentry.io"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = PipelineConfig::from_toml_str(r#"mode = "turbo""#).unwrap_err();
        assert!(err.to_string().contains("unknown verification mode 'turbo'"), "{err}");
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(PipelineConfig::from_toml_str("thread_pool = 3").is_err());
    }

    #[test]
    fn zero_workers_fail_validation() {
        let config = PipelineConfig::from_toml_str("workers = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::NoWorkers)));
    }

    #[test]
    fn zero_limit_fails_validation() {
        let config = PipelineConfig::from_toml_str("limit = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLimit)));
    }

    #[test]
    fn configure_applies_lists() {
        let config = PipelineConfig::from_toml_str(
            r#"
            extra_disposable_domains = ["Throwaway.Test"]
            dkim_selectors = ["Google", " ", "google"]
            "#,
        )
        .unwrap();
        let verifier = config.configure(Verifier::new(StubDns::new(), StubSmtp::new()));
        assert!(verifier.disposable_domains().contains("throwaway.test"));
        assert!(verifier.disposable_domains().contains("mailinator.com"));
        assert_eq!(verifier.dkim_selectors(), ["google"]);
    }

    #[test]
    fn empty_selector_list_keeps_defaults() {
        let verifier = PipelineConfig::default().configure(Verifier::new(StubDns::new(), StubSmtp::new()));
        assert_eq!(verifier.dkim_selectors().len(), 5);
    }

    #[test]
    fn default_disposable_is_builtin() {
        assert_eq!(PipelineConfig::default().disposable(), DisposableDomains::builtin());
    }
}
