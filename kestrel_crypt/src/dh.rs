//! 64-bit Diffie-Hellman key exchange.
//!
//! Usage: each side draws a local key with [`random_key`], sends
//! `exchange(local)` to the peer, and derives the shared secret with
//! `shared_key(local, remote_exchange)`. A 64-bit group is only an
//! obfuscation-grade handshake, kept for compatibility with existing
//! peers.

/// Largest 64-bit prime.
pub const PRIME: u64 = 0xFFFF_FFFF_FFFF_FFC5;
/// Group generator.
pub const GENERATOR: u64 = 5;

fn mod_mul(a: u64, b: u64, modulus: u64) -> u64 {
    ((a as u128 * b as u128) % modulus as u128) as u64
}

fn mod_exp(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut result: u64 = 1;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, modulus);
        }
        base = mod_mul(base, base, modulus);
        exp >>= 1;
    }
    result
}

/// Draws a non-zero local asymmetric key.
pub fn random_key() -> u64 {
    loop {
        let key: u64 = rand::random();
        if key != 0 {
            return key;
        }
    }
}

/// The public value to send to the peer: `g^local mod p`.
pub fn exchange(local: u64) -> u64 {
    mod_exp(GENERATOR, local, PRIME)
}

/// The shared secret: `remote^local mod p`.
pub fn shared_key(local: u64, remote: u64) -> u64 {
    mod_exp(remote, local, PRIME)
}

/// 16-char lowercase hex form used on the wire.
pub fn key_to_hex(key: u64) -> String {
    format!("{key:016x}")
}

/// Parses a hex key; `None` when the text is not valid hex.
pub fn key_from_hex(text: &str) -> Option<u64> {
    u64::from_str_radix(text, 16).ok()
}
