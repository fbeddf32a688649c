/// Lower-cased IDNA ASCII form used for every DNS query.
/// A single trailing root dot is dropped.
pub fn normalize_domain(domain: &str) -> Result<String, idna::Errors> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    idna::domain_to_ascii(trimmed).map(|ascii| ascii.to_ascii_lowercase())
}

/// Pushes every label problem of `domain` into `reasons`.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) {
    if domain.trim().is_empty() {
        reasons.push("domain is empty".to_string());
        return;
    }

    let ascii = match idna::domain_to_ascii(domain) {
        Ok(ascii) => ascii,
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return;
        }
    };

    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return;
    }
    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }
    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!("domain label '{label}' length {} > 63", label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' has invalid chars"));
        }
    }

    if let Some(tld) = ascii.rsplit('.').next() {
        if !tld.is_empty() && tld.chars().all(|c| c.is_ascii_digit()) {
            reasons.push(format!("top-level label '{tld}' cannot be numeric"));
        }
    }
}
