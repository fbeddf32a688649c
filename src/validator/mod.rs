//! Tier-1 syntax rules (RFC 5322 subset, no DNS lookup).

mod domain;
mod local;
mod types;

pub use domain::normalize_domain;
pub use types::FormatReport;

use domain::check_domain;
use local::{is_dot_atom, is_quoted_string};

/// Validates the syntax of `email`. Surrounding whitespace is ignored.
pub fn check_format(email: &str) -> FormatReport {
    let input = email.trim();
    let mut reasons = Vec::new();

    if input.len() > 254 {
        reasons.push(format!("total length {} > 254", input.len()));
    }

    let Some((local, domain)) = input.rsplit_once('@') else {
        reasons.push("must contain exactly one '@'".to_string());
        return FormatReport::from_reasons(reasons);
    };

    let quoted = is_quoted_string(local);
    if !quoted && local.contains('@') {
        reasons.push("must contain exactly one '@'".to_string());
        return FormatReport::from_reasons(reasons);
    }

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    } else if !quoted && !is_dot_atom(local) {
        reasons.push("invalid local part".to_string());
    }

    check_domain(domain, &mut reasons);

    FormatReport::from_reasons(reasons)
}

/// Substring after the last `@`, or the whole trimmed input when there is none.
pub fn domain_part(email: &str) -> &str {
    let input = email.trim();
    input
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .unwrap_or(input)
}
