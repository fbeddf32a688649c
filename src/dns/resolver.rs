use std::net::Ipv4Addr;

use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
};

use super::{DnsError, MxRecord};

/// Builds a synchronous resolver from the system configuration
/// (`/etc/resolv.conf` or the platform equivalent).
pub fn system_resolver() -> Result<Resolver, DnsError> {
    Resolver::from_system_conf().map_err(DnsError::resolver_init)
}

/// The three record types the verifier asks for.
///
/// Implementations report a confirmed absence as [`DnsError::NoRecords`]
/// and anything else (timeouts, SERVFAIL, transport errors) as
/// [`DnsError::Lookup`], so callers can tell "absent" from "unknown".
pub trait LookupDns {
    fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError>;
    fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>, DnsError>;
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError>;
}

impl LookupDns for Resolver {
    fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        let lookup = Resolver::ipv4_lookup(self, absolute(name).as_str())
            .map_err(|err| classify(name, "A", err))?;
        let addrs: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
        non_empty(name, "A", addrs)
    }

    fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>, DnsError> {
        let lookup = Resolver::mx_lookup(self, absolute(name).as_str())
            .map_err(|err| classify(name, "MX", err))?;
        let mut records: Vec<MxRecord> = lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8())))
            .collect();
        records.sort();
        records.dedup();
        non_empty(name, "MX", records)
    }

    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let lookup = Resolver::txt_lookup(self, absolute(name).as_str())
            .map_err(|err| classify(name, "TXT", err))?;
        let records: Vec<String> = lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|piece| String::from_utf8_lossy(piece))
                    .collect::<String>()
            })
            .collect();
        non_empty(name, "TXT", records)
    }
}

/// `<label>.<domain>`, lower-cased label, stray dots removed.
pub fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

/// Fully qualified form of `name`, so the resolv.conf search list is
/// never appended.
pub(crate) fn absolute(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

fn classify(name: &str, record_type: &'static str, err: ResolveError) -> DnsError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => DnsError::no_records(name, record_type),
        _ => DnsError::lookup(name, record_type, err),
    }
}

fn non_empty<T>(name: &str, record_type: &'static str, items: Vec<T>) -> Result<Vec<T>, DnsError> {
    if items.is_empty() {
        Err(DnsError::no_records(name, record_type))
    } else {
        Ok(items)
    }
}
