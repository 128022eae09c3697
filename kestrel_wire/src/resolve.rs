//! Asynchronous hostname resolution.
//!
//! A thin shim over the system resolver (via `tokio::net::lookup_host`)
//! that filters by address family and strips duplicate answers while
//! preserving the resolver's ordering.

use crate::error::WireError;
use std::net::IpAddr;

/// Which address families a resolution should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpFilter {
    /// Both IPv4 and IPv6 answers.
    #[default]
    Any,
    V4Only,
    V6Only,
}

impl IpFilter {
    fn admits(self, addr: &IpAddr) -> bool {
        match self {
            IpFilter::Any => true,
            IpFilter::V4Only => addr.is_ipv4(),
            IpFilter::V6Only => addr.is_ipv6(),
        }
    }
}

/// Resolves `host` to its addresses, filtered by family and deduplicated.
///
/// Returns an error when resolution fails outright or when the filter
/// leaves no addresses.
pub async fn resolve(host: &str, filter: IpFilter) -> Result<Vec<IpAddr>, WireError> {
    let mut addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|err| WireError::Resolve(format!("{host}: {err}")))?
        .map(|sock| sock.ip())
        .filter(|ip| filter.admits(ip))
        .collect();
    dedup_addrs(&mut addrs);
    if addrs.is_empty() {
        return Err(WireError::Resolve(format!(
            "{host}: no address for the requested family"
        )));
    }
    Ok(addrs)
}

/// Removes duplicate answers, keeping the first occurrence of each address
/// and the overall resolver ordering.
pub fn dedup_addrs(addrs: &mut Vec<IpAddr>) {
    let mut seen = Vec::with_capacity(addrs.len());
    addrs.retain(|addr| {
        if seen.contains(addr) {
            false
        } else {
            seen.push(*addr);
            true
        }
    });
}
