/// Result of the syntactic (tier 1) check. No DNS is involved.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl FormatReport {
    pub(crate) fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            ok: reasons.is_empty(),
            reasons,
        }
    }
}
