//! Caller-side helpers: pulling candidate addresses out of free text and
//! dropping the ones matching an exclusion list.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
        .expect("candidate regex is valid")
});

/// Email-like substrings of `text`, first occurrence order, compared
/// case-insensitively for duplicates.
pub fn extract_candidates(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for found in CANDIDATE_RE.find_iter(text) {
        let candidate = found.as_str().trim_end_matches('.');
        if seen.insert(candidate.to_ascii_lowercase()) {
            out.push(candidate.to_string());
        }
    }
    out
}

/// Lower-cased words; an address is excluded when it contains any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    words: BTreeSet<String>,
}

impl Exclusions {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exclusions = Self::default();
        exclusions.extend(words);
        exclusions
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
    }

    /// Reads every `*.txt` file directly inside `dir`, one word per line.
    /// A missing directory yields an empty list.
    pub fn load_dir(dir: &Path) -> std::io::Result<Self> {
        let mut exclusions = Self::default();
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no exclusions directory");
            return Ok(exclusions);
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let content = std::fs::read_to_string(&path)?;
            exclusions.extend(content.lines());
            debug!(file = %path.display(), total = exclusions.len(), "exclusions loaded");
        }
        Ok(exclusions)
    }

    pub fn is_excluded(&self, email: &str) -> bool {
        let lower = email.to_lowercase();
        self.words.iter().any(|word| lower.contains(word.as_str()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_order_without_duplicates() {
        let text = "Write to info@shop.es or Sales@Shop.es. Again: INFO@shop.es, jobs@shop.es.";
        assert_eq!(
            extract_candidates(text),
            vec!["info@shop.es", "Sales@Shop.es", "jobs@shop.es"]
        );
    }

    #[test]
    fn ignores_text_without_addresses() {
        assert!(extract_candidates("no contact here, call 958 000 000").is_empty());
        assert!(extract_candidates("user@localhost").is_empty());
    }

    #[test]
    fn exclusion_matches_substrings_case_insensitively() {
        let exclusions = Exclusions::new(["Sentry", " wixpress ", ""]);
        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.is_excluded("abc123@sentry.io"));
        assert!(exclusions.is_excluded("x@SENTRY-next.wixpress.com"));
        assert!(!exclusions.is_excluded("info@shop.es"));
    }

    #[test]
    fn empty_exclusions_keep_everything() {
        assert!(!Exclusions::default().is_excluded("anything@example.com"));
    }

    #[test]
    fn missing_dir_is_empty() {
        let exclusions = Exclusions::load_dir(Path::new("/definitely/not/here")).unwrap();
        assert!(exclusions.is_empty());
    }

    #[test]
    fn load_dir_reads_txt_files_only() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "noreply\n\n  Example \n").unwrap();
        std::fs::write(dir.path().join("b.csv"), "ignored\n").unwrap();

        let exclusions = Exclusions::load_dir(dir.path()).unwrap();

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.is_excluded("noreply@shop.es"));
        assert!(!exclusions.is_excluded("ignored@shop.es"));
    }
}
