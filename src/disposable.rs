//! Denylist of throwaway-mailbox providers.

use std::collections::BTreeSet;

use phf::phf_set;

static BUILTIN: phf::Set<&'static str> = phf_set! {
    "mailinator.com",
    "trashmail.com",
    "tempmail.com",
    "10minutemail.com",
};

/// Set of disposable domains, matched exactly against the lower-cased
/// ASCII domain of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposableDomains {
    domains: BTreeSet<String>,
}

impl Default for DisposableDomains {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DisposableDomains {
    pub fn builtin() -> Self {
        Self::from_domains(BUILTIN.iter().copied())
    }

    pub fn empty() -> Self {
        Self {
            domains: BTreeSet::new(),
        }
    }

    /// Replaces the built-in list entirely.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::empty().extended(domains)
    }

    pub fn extended<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for domain in domains {
            if let Some(normalized) = normalize(domain.as_ref()) {
                self.domains.insert(normalized);
            }
        }
        self
    }

    pub fn contains(&self, ascii_domain: &str) -> bool {
        normalize(ascii_domain).is_some_and(|d| self.domains.contains(&d))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn normalize(domain: &str) -> Option<String> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}
