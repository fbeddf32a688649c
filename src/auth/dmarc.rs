use crate::dns::{LookupDns, fqdn};
use crate::verifier::CheckOutcome;

use super::txt_tag_outcome;

pub(crate) const DMARC_TAG: &str = "v=dmarc1";
pub(crate) const NO_DMARC: &str = "No DMARC records";

/// Passes when `_dmarc.<domain>` publishes a DMARC policy.
pub fn check_dmarc<R>(resolver: &R, ascii_domain: &str) -> CheckOutcome
where
    R: LookupDns + ?Sized,
{
    let name = fqdn("_dmarc", ascii_domain);
    txt_tag_outcome(resolver, &name, DMARC_TAG, NO_DMARC)
}
