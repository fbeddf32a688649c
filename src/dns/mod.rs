//! DNS lookups behind a small trait so the checks can run against a stub.
//!
//! [`LookupDns`] is implemented for the synchronous `trust-dns-resolver`
//! [`Resolver`](trust_dns_resolver::Resolver) built by [`system_resolver`].

mod error;
mod resolver;
mod types;

pub use error::DnsError;
pub use resolver::{LookupDns, fqdn, system_resolver};
pub use types::{MxRecord, primary_exchange};
