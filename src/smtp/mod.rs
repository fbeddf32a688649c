//! SMTP liveness probe (tier 3).
//!
//! [`check_smtp`] runs a greeting/QUIT handshake through an [`SmtpProbe`]
//! and folds every transport failure into a [`CheckOutcome`]; nothing is
//! propagated to the caller.

mod error;
mod probe;
mod session;

pub use error::SmtpError;
pub use probe::{SMTP_PORT, SMTP_TIMEOUT, SmtpHandshake, SmtpProbe};
pub use session::SmtpReply;

use crate::verifier::CheckOutcome;

pub(crate) const NO_SMTP: &str = "Server not responding";

pub fn check_smtp<P>(probe: &P, host: &str) -> CheckOutcome
where
    P: SmtpProbe + ?Sized,
{
    match probe.handshake(host) {
        Ok(greeting) if greeting.is_positive_completion() => CheckOutcome::Passed,
        Ok(greeting) => CheckOutcome::Failed(format!("{NO_SMTP} (greeting {})", greeting.code)),
        Err(err) if err.is_refused() => CheckOutcome::Failed(NO_SMTP.to_string()),
        Err(err) => CheckOutcome::Inconclusive(format!("{NO_SMTP}: {err}")),
    }
}
