//! XTEA block cipher: <https://en.wikipedia.org/wiki/XTEA>
//!
//! Operates on one 64-bit block as two native-order `u32` words. 32 rounds
//! is the standard strength.

const DELTA: u32 = 0x9E37_79B9;

/// Enciphers one block in place.
pub fn encipher(rounds: u32, key: &[u32; 4], block: &mut [u32; 2]) {
    let (mut v0, mut v1) = (block[0], block[1]);
    let mut sum: u32 = 0;
    for _ in 0..rounds {
        v0 = v0.wrapping_add(
            (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1))
                ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
        sum = sum.wrapping_add(DELTA);
        v1 = v1.wrapping_add(
            (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
    }
    block[0] = v0;
    block[1] = v1;
}

/// Deciphers one block in place.
pub fn decipher(rounds: u32, key: &[u32; 4], block: &mut [u32; 2]) {
    let (mut v0, mut v1) = (block[0], block[1]);
    let mut sum: u32 = DELTA.wrapping_mul(rounds);
    for _ in 0..rounds {
        v1 = v1.wrapping_sub(
            (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
        sum = sum.wrapping_sub(DELTA);
        v0 = v0.wrapping_sub(
            (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1))
                ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
    }
    block[0] = v0;
    block[1] = v1;
}
