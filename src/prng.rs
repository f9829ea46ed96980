//! Deterministic pseudo-random generators used to build puzzle stacks.
//!
//! Two independent generators are provided:
//! - `GaloisLfsr`: a 32-bit Galois linear-feedback shift register. Fast, full period,
//!   and the source behind `SliceStack::new_random`.
//! - `SplitMix64`: a 64-bit splitmix generator for when a better mixed stream is wanted.
//!
//! Neither generator is global. Every caller owns its generator (or borrows it mutably),
//! so independent streams can coexist and sharing one across threads has to be explicit.
//! Both implement `rand::RngCore` and `rand::SeedableRng`, which lets them drive any
//! `rand` API (`gen_range`, `shuffle`, ...).
use rand::{Error, RngCore, SeedableRng};

/// Feedback taps applied when the low bit of the register is set.
pub const LFSR_TAPS: u32 = 0x8020_0003;

/// Register value used when a generator is seeded with zero or built with `Default`.
///
/// Zero is a fixed point of the register (it would yield zero forever), so it is
/// never used as a state.
pub const DEFAULT_LFSR_SEED: u32 = 34;

const SPLITMIX64_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX64_MUL_1: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX64_MUL_2: u64 = 0x94D0_49BB_1331_11EB;

/// A 32-bit Galois LFSR.
///
/// Each step shifts the register right by one and, when the bit shifted out was set,
/// xors in [`LFSR_TAPS`]. The returned value is the new register.
///
/// # Examples
/// ```
/// use slice_sort::prng::GaloisLfsr;
///
/// let mut a = GaloisLfsr::new(7);
/// let mut b = GaloisLfsr::new(7);
/// assert_eq!(a.next_u32(), b.next_u32());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GaloisLfsr {
    register: u32,
}

impl GaloisLfsr {
    /// Creates a generator seeded with `seed` (zero is replaced by [`DEFAULT_LFSR_SEED`]).
    pub fn new(seed: u32) -> Self {
        let mut lfsr = GaloisLfsr {
            register: DEFAULT_LFSR_SEED,
        };
        lfsr.seed(seed);
        lfsr
    }

    /// Reseeds the register. The following output sequence depends only on `seed`.
    pub fn seed(&mut self, seed: u32) {
        self.register = if seed == 0 { DEFAULT_LFSR_SEED } else { seed };
    }

    /// Current register value (the last value returned, or the seed).
    pub fn state(&self) -> u32 {
        self.register
    }

    /// Advances the register one step and returns it.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let r = self.register;
        self.register = (r >> 1) ^ ((r & 1).wrapping_neg() & LFSR_TAPS);
        self.register
    }

    /// Draws an integer from `rmin` to `rmax` by scaling the next register value.
    ///
    /// The register is mapped to the unit interval and linearly into the range,
    /// rounding by adding one half before truncation. The mapping is approximate:
    /// both endpoints get half the weight of interior values and `rmax` itself can be
    /// returned. Good enough for dealing puzzle colors, not for statistics.
    ///
    /// # Examples
    /// ```
    /// use slice_sort::prng::GaloisLfsr;
    ///
    /// let mut lfsr = GaloisLfsr::new(0x1029_3847);
    /// assert_eq!(lfsr.next_in_range(0, 1000), 532);
    /// ```
    pub fn next_in_range(&mut self, rmin: i32, rmax: i32) -> i32 {
        const INV_U32_MAX: f32 = 1.0 / (u32::MAX as f32);
        let unit = self.next_u32() as f32 * INV_U32_MAX;
        let span = (rmax - rmin) as f32;
        (unit * span + 0.5) as i32 + rmin
    }
}

impl Default for GaloisLfsr {
    fn default() -> Self {
        GaloisLfsr::new(DEFAULT_LFSR_SEED)
    }
}

impl RngCore for GaloisLfsr {
    fn next_u32(&mut self) -> u32 {
        GaloisLfsr::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = GaloisLfsr::next_u32(self) as u64;
        let lo = GaloisLfsr::next_u32(self) as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = GaloisLfsr::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for GaloisLfsr {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        GaloisLfsr::new(u32::from_le_bytes(seed))
    }
}

/// The splitmix64 generator.
///
/// The state advances by a fixed odd increment and the output is mixed through two
/// xor-shift/multiply rounds. Any seed, including zero, is valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        SplitMix64 { state: seed }
    }

    pub fn seed(&mut self, seed: u64) {
        self.state = seed;
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_MUL_1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_MUL_2);
        z ^ (z >> 31)
    }
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        (SplitMix64::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        SplitMix64::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = SplitMix64::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        SplitMix64::new(u64::from_le_bytes(seed))
    }

    // The raw state is already a good seed; skip rand's PCG expansion.
    fn seed_from_u64(state: u64) -> Self {
        SplitMix64::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    #[test]
    fn test_lfsr_first_value_after_seeding() {
        let expected: [u32; 10] = [
            2149580803, 1, 2149580802, 2, 2149580801, 3, 2149580800, 4, 2149580807, 5,
        ];
        let mut lfsr = GaloisLfsr::default();
        for (i, want) in expected.iter().enumerate() {
            lfsr.seed(i as u32 + 1);
            assert_eq!(lfsr.next_u32(), *want, "seed {}", i + 1);
        }
    }

    #[test]
    fn test_lfsr_consecutive_values() {
        let expected: [u32; 10] = [
            2149580803, 3224371202, 1612185601, 2955673603, 3627417602, 1813708801, 3056435203,
            3677798402, 1838899201, 3069030403,
        ];
        let mut lfsr = GaloisLfsr::new(1);
        for want in expected {
            assert_eq!(lfsr.next_u32(), want);
        }
    }

    #[test]
    fn test_lfsr_next_in_range_reference_values() {
        let expected: [i32; 10] = [532, 266, 133, 67, 33, 17, 508, 754, 377, 689];
        let mut lfsr = GaloisLfsr::new(0x1029_3847);
        for want in expected {
            assert_eq!(lfsr.next_in_range(0, 1000), want);
        }
    }

    #[test]
    fn test_lfsr_next_in_range_stays_within_inclusive_bounds() {
        let mut lfsr = GaloisLfsr::new(99);
        for _ in 0..10_000 {
            let v = lfsr.next_in_range(0, 7);
            assert!((0..=7).contains(&v), "value {} escaped [0, 7]", v);
        }
        for _ in 0..1_000 {
            let v = lfsr.next_in_range(-3, 3);
            assert!((-3..=3).contains(&v));
        }
    }

    #[test]
    fn test_lfsr_reproducible_for_same_seed() {
        let draw = |seed| {
            let mut lfsr = GaloisLfsr::new(seed);
            (0..256).map(|_| lfsr.next_u32()).collect::<Vec<_>>()
        };
        assert_eq!(draw(0xDEAD_BEEF), draw(0xDEAD_BEEF));
        assert_ne!(draw(0xDEAD_BEEF), draw(0xDEAD_BEEF ^ 1));
    }

    #[test]
    fn test_lfsr_does_not_repeat_early() {
        let mut lfsr = GaloisLfsr::new(1);
        let mut seen = HashSet::new();
        for _ in 0..100_000 {
            let v = lfsr.next_u32();
            assert_ne!(v, 0);
            assert!(seen.insert(v), "register repeated after {} draws", seen.len());
        }
    }

    #[test]
    fn test_lfsr_zero_seed_uses_default() {
        let mut zero = GaloisLfsr::new(0);
        let mut default = GaloisLfsr::default();
        assert_eq!(zero.state(), DEFAULT_LFSR_SEED);
        assert_eq!(zero.next_u32(), default.next_u32());
        assert_ne!(zero.next_u32(), 0);
    }

    #[test]
    fn test_splitmix64_reference_values() {
        let mut sm = SplitMix64::new(0);
        assert_eq!(sm.next_u64(), 16294208416658607535);
        assert_eq!(sm.next_u64(), 7960286522194355700);
        assert_eq!(sm.next_u64(), 487617019471545679);
    }

    #[test]
    fn test_splitmix64_reseed_restarts_stream() {
        let mut sm = SplitMix64::new(42);
        let first: Vec<u64> = (0..8).map(|_| sm.next_u64()).collect();
        sm.seed(42);
        let second: Vec<u64> = (0..8).map(|_| sm.next_u64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generators_drive_rand_api() {
        let mut lfsr = GaloisLfsr::seed_from_u64(5);
        let mut sm = SplitMix64::seed_from_u64(5);
        for _ in 0..1_000 {
            assert!(lfsr.gen_range(0..8u8) < 8);
            assert!(sm.gen_range(0..8u8) < 8);
        }

        let mut bytes = [0u8; 7];
        sm.fill_bytes(&mut bytes);
        let mut again = SplitMix64::seed_from_u64(5);
        for _ in 0..1_000 {
            again.gen_range(0..8u8);
        }
        let mut expected = [0u8; 7];
        again.fill_bytes(&mut expected);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_lfsr_from_seed_bytes() {
        let a = GaloisLfsr::from_seed(7u32.to_le_bytes());
        assert_eq!(a, GaloisLfsr::new(7));
    }
}
