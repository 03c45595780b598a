use rand::RngCore;

/// Small linear congruential generator. Deterministic for a given seed and cheap enough
/// to call tens of thousands of times per frame.
#[derive(Clone, Debug)]
pub struct FastRandom {
    state: u64,
}

impl FastRandom {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform in [0, 1].
    pub fn next_unit_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }

    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit_f32() * (max - min)
    }

    pub fn next_u8(&mut self) -> u8 {
        (self.next_u32() & 0xff) as u8
    }

    /// Uniform in `[min, max)`; returns `min` for an empty range.
    pub fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max as i64 - min as i64) as u64;
        (min as i64 + (self.next_u32() as u64 % span) as i64) as i32
    }
}

impl RngCore for FastRandom {
    fn next_u32(&mut self) -> u32 {
        FastRandom::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        ((FastRandom::next_u32(self) as u64) << 32) | FastRandom::next_u32(self) as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = FastRandom::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
