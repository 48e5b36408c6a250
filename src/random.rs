/// Deterministic RNG for spawn timing and loot rolls.
///
/// Linear congruential generator; the upper 32 bits of the state are the usable
/// output. Seeded explicitly so a whole session can be replayed in tests.
#[derive(Debug, Clone, Copy)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    fn next_bits(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform f32 in [0, 1).
    pub fn unit(&mut self) -> f32 {
        // 24 bits of mantissa, so the result is exactly representable
        (self.next_bits() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform f32 in [min, max). Returns min when the range is empty or inverted.
    pub fn between(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.unit() * (max - min)
    }

    /// Jitter draw: uniform in [min, max). Named separately because callers use it
    /// as a multiplicative spread around a configured rate or weight.
    pub fn distributed(&mut self, min: f32, max: f32) -> f32 {
        self.between(min, max)
    }

    /// Biased draw in [min, max): the uniform sample is raised to `exponent`
    /// before scaling, so exponents > 1 favor the low end of the range.
    pub fn distributed_pow(&mut self, min: f32, max: f32, exponent: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.unit().powf(exponent) * (max - min)
    }

    /// Uniform integer in [min, max] inclusive.
    pub fn roll_range(&mut self, min: u32, max: u32) -> u32 {
        let (min, max) = if min >= max { (min, min) } else { (min, max) };
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_bits()) % span) as u32
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_seed(0x9e3779b97f4a7c15)
    }
}
