use tracing::debug;

use crate::dns::{LookupDns, fqdn};
use crate::verifier::CheckOutcome;

use super::contains_tag;

pub(crate) const DKIM_TAG: &str = "v=dkim1";
pub(crate) const NO_DKIM: &str = "No DKIM records";

/// Selectors probed when the caller does not supply its own list.
pub const DEFAULT_DKIM_SELECTORS: [&str; 5] = ["default", "dkim", "selector1", "selector2", "mail"];

/// Probes `<selector>._domainkey.<domain>` for each selector in order and
/// passes on the first key record found.
///
/// DKIM keys cannot be enumerated, so a miss only means none of the probed
/// selectors is in use. A failed lookup on one selector does not stop the
/// probe; it only turns an overall miss into [`CheckOutcome::Inconclusive`].
pub fn check_dkim<R, S>(resolver: &R, ascii_domain: &str, selectors: &[S]) -> CheckOutcome
where
    R: LookupDns + ?Sized,
    S: AsRef<str>,
{
    let mut lookup_error = None;

    for selector in selectors {
        let name = fqdn(&format!("{}._domainkey", selector.as_ref()), ascii_domain);
        match resolver.lookup_txt(&name) {
            Ok(records) if contains_tag(&records, DKIM_TAG) => {
                debug!(%name, "dkim key found");
                return CheckOutcome::Passed;
            }
            Ok(_) => {}
            Err(err) if err.is_no_records() => {}
            Err(err) => {
                debug!(%name, error = %err, "dkim selector lookup failed");
                lookup_error.get_or_insert(err);
            }
        }
    }

    match lookup_error {
        Some(err) => CheckOutcome::Inconclusive(format!("{NO_DKIM}: {err}")),
        None => CheckOutcome::Failed(NO_DKIM.to_string()),
    }
}
