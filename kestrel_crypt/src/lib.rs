//! Compatibility crypto and PRNG primitives.
//!
//! Direct reproductions of the published algorithms peers already speak:
//! hex digests and checksums, timestamped request signatures, the RC4 and
//! XTEA ciphers, a 64-bit Diffie-Hellman handshake, and deterministic
//! pseudo-random generators. None of these carry protocol state; each is a
//! small, independently testable function or value type.

pub mod dh;
pub mod digest;
pub mod prng;
pub mod rc4;
pub mod signature;
pub mod xtea;

pub use digest::{checksum, crc32, digest_to_hex, md5sum, sha1sum};
pub use prng::{Pcg32, RandomBox};
pub use rc4::Rc4;
pub use signature::{sign_md5, signature_time, verify_md5};
