//! Deterministic Park–Miller generator used to build reproducible frame
//! sequences in tests.

const M: u32 = 0x7fffffff;
const A: u64 = 16807;

pub struct Random {
    seed: u32,
}

impl Random {
    pub fn new(seed: u32) -> Self {
        let mut seed = seed & M;
        if seed == 0 || seed == M {
            seed = 1;
        }
        Self { seed }
    }

    pub fn next(&mut self) -> u32 {
        let product = self.seed as u64 * A;
        // product % M
        self.seed = ((product >> 31) + (product & M as u64)) as u32;
        if self.seed > M {
            self.seed -= M;
        }
        self.seed
    }

    pub fn uniform(&mut self, n: u32) -> u32 {
        self.next() % n
    }

    /// Picks a value in `[0, 2^max_log)`, biased towards small numbers.
    pub fn skewed(&mut self, max_log: u32) -> u32 {
        let tmp = 1 << self.uniform(max_log + 1);
        self.uniform(tmp)
    }

    /// Returns true roughly once every `n` calls.
    pub fn one_in(&mut self, n: u32) -> bool {
        self.uniform(n) == 0
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.uniform(256) as u8).collect()
    }

    /// A frame payload whose length is skewed towards short frames but can
    /// reach `2^max_log - 1` bytes.
    pub fn payload(&mut self, max_log: u32) -> Vec<u8> {
        let len = self.skewed(max_log) as usize;
        self.bytes(len)
    }
}

#[cfg(test)]
mod tests {
    use super::Random;

    #[test]
    fn test_random_is_deterministic() {
        let mut a = Random::new(301);
        let mut b = Random::new(301);
        for _ in 0..1000 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_random_bounds() {
        let mut rnd = Random::new(0);
        for _ in 0..1000 {
            assert!(rnd.uniform(13) < 13);
            assert!(rnd.skewed(12) < 1 << 12);
        }
        assert_eq!(64, rnd.bytes(64).len());
        for _ in 0..100 {
            assert!(rnd.payload(4).len() < 16);
        }
    }

    #[test]
    fn test_random_one_in() {
        let mut rnd = Random::new(301);
        assert!((0..100).all(|_| rnd.one_in(1)));
        let hits = (0..6000).filter(|_| rnd.one_in(6)).count();
        assert!(hits > 500 && hits < 1500);
    }
}
