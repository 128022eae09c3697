//! Deterministic pseudo-random generators.
//!
//! Reproductions of the classic linear-congruential steppers (for
//! interoperating with peers that seed them identically), a dealing box
//! that emits every value of a range exactly once per cycle, and O'Neill's
//! PCG-XSH-RR 64/32: <https://www.pcg-random.org/>

/// `rand()` of the C99 sample implementation; output range `0..=32767`.
pub fn lcg_c99(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
    (*seed / 65536) % 32768
}

/// `rand()` of the MSVC runtime; output range `0..=32767`.
pub fn lcg_msvc(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(214_013).wrapping_add(2_531_011);
    (*seed >> 16) & 0x7FFF
}

/// C++ `minstd_rand`; output range `1..0x7FFFFFFF` for a non-zero seed.
pub fn lcg_minstd(seed: &mut u32) -> u32 {
    *seed = ((*seed as u64 * 48271) % 0x7FFF_FFFF) as u32;
    *seed
}

/// Deals every value in `0..size` exactly once per cycle, in a
/// pseudo-random order driven by the seed.
pub struct RandomBox {
    seed: u32,
    state: Vec<u32>,
    avail: u32,
}

impl RandomBox {
    pub fn new(size: u32) -> Self {
        Self {
            seed: 0,
            state: (0..size).collect(),
            avail: size,
        }
    }

    /// Re-seeds the deal order; the current cycle position is kept.
    pub fn seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Next value in `0..size`. Each value appears exactly once before any
    /// repeats; a zero-sized box always yields 0.
    pub fn next(&mut self) -> u32 {
        if self.state.is_empty() {
            return 0;
        }
        if self.avail == 0 {
            self.avail = self.state.len() as u32;
        }
        let pick = (lcg_msvc(&mut self.seed) % self.avail) as usize;
        let last = (self.avail - 1) as usize;
        self.state.swap(pick, last);
        self.avail -= 1;
        self.state[last]
    }
}

const PCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// PCG-XSH-RR 64/32 generator state.
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    /// Seeds from an initial state and a stream-selector sequence value.
    pub fn new(init_state: u64, init_seq: u64) -> Self {
        let mut pcg = Self {
            state: 0,
            inc: (init_seq << 1) | 1,
        };
        let _ = pcg.next_u32();
        pcg.state = pcg.state.wrapping_add(init_state);
        let _ = pcg.next_u32();
        pcg
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG_MULTIPLIER).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Unbiased value in `0..bound`; 0 when `bound` is 0.
    pub fn next_bounded(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u32();
            if r >= threshold {
                return r % bound;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c99_sample_sequence() {
        // the sequence printed by the C standard's sample implementation
        let mut seed = 1u32;
        assert_eq!(lcg_c99(&mut seed), 16838);
        assert_eq!(lcg_c99(&mut seed), 5758);
        assert_eq!(lcg_c99(&mut seed), 10113);
    }

    #[test]
    fn msvc_outputs_stay_in_range() {
        let mut seed = 0u32;
        for _ in 0..1000 {
            assert!(lcg_msvc(&mut seed) < 32768);
        }
    }

    #[test]
    fn minstd_matches_the_published_10000th_value() {
        // std::minstd_rand is specified to produce 399268537 as its
        // 10000th output from seed 1
        let mut seed = 1u32;
        let mut last = 0;
        for _ in 0..10000 {
            last = lcg_minstd(&mut seed);
        }
        assert_eq!(last, 399_268_537);
    }

    #[test]
    fn random_box_deals_every_value_once_per_cycle() {
        let mut random_box = RandomBox::new(16);
        random_box.seed(0xC0FFEE);
        for _ in 0..3 {
            let mut seen: Vec<u32> = (0..16).map(|_| random_box.next()).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..16).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn random_box_zero_size_yields_zero() {
        let mut random_box = RandomBox::new(0);
        assert_eq!(random_box.next(), 0);
        assert_eq!(random_box.next(), 0);
    }

    #[test]
    fn pcg_reference_stream() {
        // pcg32_srandom(42, 54) reference outputs
        let mut pcg = Pcg32::new(42, 54);
        assert_eq!(pcg.next_u32(), 0xA15C_02B7);
        assert_eq!(pcg.next_u32(), 0x7B47_F409);
        assert_eq!(pcg.next_u32(), 0xBA1D_3330);
    }

    #[test]
    fn pcg_streams_are_independent() {
        let mut a = Pcg32::new(7, 1);
        let mut b = Pcg32::new(7, 2);
        let same = (0..8).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 8);
    }

    #[test]
    fn pcg_bounded_stays_in_bound() {
        let mut pcg = Pcg32::new(1, 1);
        for _ in 0..1000 {
            assert!(pcg.next_bounded(10) < 10);
        }
        assert_eq!(pcg.next_bounded(0), 0);
        assert_eq!(pcg.next_bounded(1), 0);
    }
}
