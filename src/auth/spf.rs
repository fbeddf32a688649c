use crate::dns::LookupDns;
use crate::verifier::CheckOutcome;

use super::txt_tag_outcome;

pub(crate) const SPF_TAG: &str = "v=spf1";
pub(crate) const NO_SPF: &str = "No SPF records";

/// Passes when the domain's own TXT set publishes an SPF policy.
pub fn check_spf<R>(resolver: &R, ascii_domain: &str) -> CheckOutcome
where
    R: LookupDns + ?Sized,
{
    txt_tag_outcome(resolver, ascii_domain, SPF_TAG, NO_SPF)
}
