use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DnsError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    /// The name exists-or-not question was answered: nothing to return.
    /// Covers NXDOMAIN and NOERROR/NODATA responses.
    #[error("no {record_type} records for {name}")]
    NoRecords {
        name: String,
        record_type: &'static str,
    },
    /// The resolver could not produce an answer (timeout, SERVFAIL, I/O).
    #[error("{record_type} lookup failed for {name}: {source}")]
    Lookup {
        name: String,
        record_type: &'static str,
        #[source]
        source: BoxError,
    },
}

impl DnsError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn no_records(name: impl Into<String>, record_type: &'static str) -> Self {
        Self::NoRecords {
            name: name.into(),
            record_type,
        }
    }

    pub(crate) fn lookup(
        name: impl Into<String>,
        record_type: &'static str,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Lookup {
            name: name.into(),
            record_type,
            source: source.into(),
        }
    }

    /// `true` when the answer is a confirmed absence rather than a failed query.
    pub fn is_no_records(&self) -> bool {
        matches!(self, Self::NoRecords { .. })
    }
}
