//! Timestamped MD5 request signatures.
//!
//! A signature is 40 hex characters: the first 8 encode the little-endian
//! unix timestamp, the remaining 32 are the MD5 of
//! `"SIGNATURE" ++ data ++ secret ++ timestamp_bytes`. The embedded
//! timestamp lets a verifier reject stale requests before recomputing the
//! digest.

use crate::digest::digest_to_hex;
use md5::{Digest, Md5};

const SIGNATURE_TAG: &[u8] = b"SIGNATURE";

/// Signs `data` with a shared secret and a unix-epoch timestamp.
pub fn sign_md5(data: &[u8], secret: &[u8], timestamp: u32) -> String {
    let ts = timestamp.to_le_bytes();
    let mut md5 = Md5::new();
    md5.update(SIGNATURE_TAG);
    md5.update(data);
    md5.update(secret);
    md5.update(ts);
    let mut out = digest_to_hex(&ts);
    out.push_str(&digest_to_hex(&md5.finalize()));
    out
}

/// Recovers the timestamp embedded in a signature, or `None` when the
/// leading characters are not valid hex.
pub fn signature_time(signature: &str) -> Option<u32> {
    let head = signature.get(..8)?;
    let mut bytes = [0u8; 4];
    for (slot, chunk) in bytes.iter_mut().zip(head.as_bytes().chunks(2)) {
        let pair = std::str::from_utf8(chunk).ok()?;
        *slot = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(u32::from_le_bytes(bytes))
}

/// Recomputes the signature for `data` at the timestamp a received
/// signature claims, and compares.
pub fn verify_md5(signature: &str, data: &[u8], secret: &[u8]) -> bool {
    match signature_time(signature) {
        Some(timestamp) => sign_md5(data, secret, timestamp) == signature,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_has_expected_shape() {
        let sig = sign_md5(b"payload", b"secret", 0x1234_5678);
        assert_eq!(sig.len(), 40);
        assert!(sig.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn timestamp_round_trips() {
        for ts in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
            let sig = sign_md5(b"x", b"k", ts);
            assert_eq!(signature_time(&sig), Some(ts));
        }
        assert_eq!(signature_time("zz"), None);
        assert_eq!(signature_time("zzzzzzzz0000"), None);
    }

    #[test]
    fn verification_detects_tampering() {
        let sig = sign_md5(b"payload", b"secret", 1_700_000_000);
        assert!(verify_md5(&sig, b"payload", b"secret"));
        assert!(!verify_md5(&sig, b"payload!", b"secret"));
        assert!(!verify_md5(&sig, b"payload", b"wrong"));
    }

    #[test]
    fn secret_changes_the_digest_but_not_the_timestamp() {
        let a = sign_md5(b"data", b"k1", 42);
        let b = sign_md5(b"data", b"k2", 42);
        assert_eq!(&a[..8], &b[..8]);
        assert_ne!(&a[8..], &b[8..]);
    }
}
