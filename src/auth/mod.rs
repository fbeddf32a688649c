//! Tier-3 DNS policy checks: SPF, DMARC and DKIM presence.
//!
//! Each check only asks whether a TXT record carrying the version tag is
//! published; record contents are not graded.

mod dkim;
mod dmarc;
mod spf;

pub use dkim::{DEFAULT_DKIM_SELECTORS, check_dkim};
pub use dmarc::check_dmarc;
pub use spf::check_spf;

use crate::dns::LookupDns;
use crate::verifier::CheckOutcome;

/// Looks up TXT records at `name` and passes when one contains `tag`.
pub(crate) fn txt_tag_outcome<R>(
    resolver: &R,
    name: &str,
    tag: &str,
    failure: &str,
) -> CheckOutcome
where
    R: LookupDns + ?Sized,
{
    match resolver.lookup_txt(name) {
        Ok(records) if contains_tag(&records, tag) => CheckOutcome::Passed,
        Ok(_) => CheckOutcome::Failed(failure.to_string()),
        Err(err) if err.is_no_records() => CheckOutcome::Failed(failure.to_string()),
        Err(err) => CheckOutcome::Inconclusive(format!("{failure}: {err}")),
    }
}

pub(crate) fn contains_tag(records: &[String], tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    records
        .iter()
        .any(|record| record.to_ascii_lowercase().contains(&tag))
}
