//! IPv4/IPv6 socket address marshalling.
//!
//! A [`SockAddress`] is a tagged variant over the two address families,
//! carrying the concrete address bytes and port. It replaces the classic
//! union-of-`sockaddr` layout with explicit variants, and converts to and
//! from both `std::net::SocketAddr` and the transport layer's native
//! [`socket2::SockAddr`] representation.

use crate::error::WireError;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

/// Address family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

/// A socket address tagged by family, carrying raw address bytes and port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SockAddress {
    V4 { ip: [u8; 4], port: u16 },
    V6 { ip: [u8; 16], port: u16 },
}

impl SockAddress {
    pub fn new_v4(ip: [u8; 4], port: u16) -> Self {
        SockAddress::V4 { ip, port }
    }

    pub fn new_v6(ip: [u8; 16], port: u16) -> Self {
        SockAddress::V6 { ip, port }
    }

    /// Builds an address from text and port, inferring the family from the
    /// text: anything containing `:` is treated as IPv6.
    pub fn make(text: &str, port: u16) -> Result<Self, WireError> {
        match Self::family_of_text(text) {
            IpFamily::V4 => Ok(Self::new_v4(Ipv4Addr::from_str(text)?.octets(), port)),
            IpFamily::V6 => Ok(Self::new_v6(Ipv6Addr::from_str(text)?.octets(), port)),
        }
    }

    /// Family an address literal would be parsed as: `:` means IPv6.
    pub fn family_of_text(text: &str) -> IpFamily {
        if text.contains(':') {
            IpFamily::V6
        } else {
            IpFamily::V4
        }
    }

    pub fn family(&self) -> IpFamily {
        match self {
            SockAddress::V4 { .. } => IpFamily::V4,
            SockAddress::V6 { .. } => IpFamily::V6,
        }
    }

    /// Raw address bytes: 4 for IPv4, 16 for IPv6.
    pub fn ip_bytes(&self) -> &[u8] {
        match self {
            SockAddress::V4 { ip, .. } => ip,
            SockAddress::V6 { ip, .. } => ip,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            SockAddress::V4 { port, .. } | SockAddress::V6 { port, .. } => *port,
        }
    }

    pub fn set_port(&mut self, new_port: u16) {
        match self {
            SockAddress::V4 { port, .. } | SockAddress::V6 { port, .. } => *port = new_port,
        }
    }

    pub fn ip(&self) -> IpAddr {
        match self {
            SockAddress::V4 { ip, .. } => IpAddr::V4(Ipv4Addr::from(*ip)),
            SockAddress::V6 { ip, .. } => IpAddr::V6(Ipv6Addr::from(*ip)),
        }
    }

    /// Converts to the transport layer's native `sockaddr` representation.
    pub fn to_native(&self) -> socket2::SockAddr {
        socket2::SockAddr::from(SocketAddr::from(*self))
    }

    /// Converts back from a native `sockaddr`; `None` for non-IP families.
    pub fn from_native(addr: &socket2::SockAddr) -> Option<Self> {
        addr.as_socket().map(Into::into)
    }
}

impl From<SocketAddr> for SockAddress {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => SockAddress::new_v4(v4.ip().octets(), v4.port()),
            SocketAddr::V6(v6) => SockAddress::new_v6(v6.ip().octets(), v6.port()),
        }
    }
}

impl From<SockAddress> for SocketAddr {
    fn from(addr: SockAddress) -> Self {
        SocketAddr::new(addr.ip(), addr.port())
    }
}

impl Display for SockAddress {
    /// `a.b.c.d:port` for IPv4, `[addr]:port` for IPv6.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&SocketAddr::from(*self), f)
    }
}

impl Ord for SockAddress {
    /// Total order: family first, then address bytes, then port.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SockAddress::V4 { .. }, SockAddress::V6 { .. }) => Ordering::Less,
            (SockAddress::V6 { .. }, SockAddress::V4 { .. }) => Ordering::Greater,
            (SockAddress::V4 { ip: a, port: p }, SockAddress::V4 { ip: b, port: q })
            => a.cmp(b).then(p.cmp(q)),
            (SockAddress::V6 { ip: a, port: p }, SockAddress::V6 { ip: b, port: q })
            => a.cmp(b).then(p.cmp(q)),
        }
    }
}

impl PartialOrd for SockAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
