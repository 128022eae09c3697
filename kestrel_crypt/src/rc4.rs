//! RC4 stream cipher.
//!
//! Kept for wire compatibility with legacy peers; do not use for new
//! protocol features.

/// RC4 keystream state.
pub struct Rc4 {
    x: u8,
    y: u8,
    state: [u8; 256],
}

impl Rc4 {
    /// Key-schedules a new cipher. An empty key is treated as a single
    /// zero byte.
    pub fn new(key: &[u8]) -> Self {
        let key = if key.is_empty() { &[0u8][..] } else { key };
        let mut state = [0u8; 256];
        for (i, slot) in state.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut j: u8 = 0;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }
        Self { x: 0, y: 0, state }
    }

    /// XORs the keystream over `data` in place. Encryption and decryption
    /// are the same operation.
    pub fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            self.x = self.x.wrapping_add(1);
            self.y = self.y.wrapping_add(self.state[self.x as usize]);
            self.state.swap(self.x as usize, self.y as usize);
            let k = self.state[self.x as usize].wrapping_add(self.state[self.y as usize]);
            *byte ^= self.state[k as usize];
        }
    }

    /// Applies `passes` independently keyed passes over `data` in place.
    pub fn crypt(key: &[u8], data: &mut [u8], passes: usize) {
        for _ in 0..passes {
            Rc4::new(key).apply(data);
        }
    }
}
