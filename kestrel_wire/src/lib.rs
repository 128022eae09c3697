//! Socket address marshalling and DNS resolution.
//!
//! Peripheral collaborators for the kestrel event-loop primitives: a
//! family-tagged socket address type with native `sockaddr` conversions,
//! and a resolver shim with family filtering and answer deduplication.

pub mod address;
pub mod error;
pub mod resolve;

pub use address::{IpFamily, SockAddress};
pub use error::WireError;
pub use resolve::{dedup_addrs, resolve, IpFilter};
