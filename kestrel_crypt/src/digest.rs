//! Message digests and checksums.

use md5::{Digest, Md5};
use sha1::Sha1;
use std::fmt::Write;

/// Lowercase hex rendering of a digest.
pub fn digest_to_hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // writing to a String cannot fail
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// MD5 of `data` as a 32-char hex string.
pub fn md5sum(data: &[u8]) -> String {
    digest_to_hex(&Md5::digest(data))
}

/// SHA-1 of `data` as a 40-char hex string.
pub fn sha1sum(data: &[u8]) -> String {
    digest_to_hex(&Sha1::digest(data))
}

const CRC32_TABLE: [u32; 256] = crc32_table();

const fn crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

/// CRC-32 (IEEE 802.3 polynomial) of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = !0u32;
    for &byte in data {
        c = CRC32_TABLE[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8);
    }
    !c
}

/// Plain byte sum, wrapping at 32 bits.
pub fn checksum(data: &[u8]) -> u32 {
    data.iter().fold(0u32, |acc, &b| acc.wrapping_add(b as u32))
}
