//! Fast PRNG for combat trials. Uses SplitMix64 for throughput and good
//! statistical quality. Deterministic: same seed produces the same sequence.
//! Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// One six-sided die, 1..=6. Signed so roll adjustments (artillery
    /// support, amphibious marines) may push the value to zero or below.
    #[inline]
    pub fn d6(&mut self) -> i32 {
        (self.next_u64() % 6) as i32 + 1
    }
}

/// Wall-clock base seed for callers that do not need reproducibility.
/// Reproducible runs should pass their own base seed instead.
pub fn clock_seed() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
