//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("TAGSTREAM_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random tag or attribute name: a letter, then identifier characters
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.7);
        let mut name = String::with_capacity(len);
        name.push(self.rng.gen_range('a'..='z'));
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_.:";
        for _ in 1..len {
            name.push(chars[self.rng.gen_range(0..chars.len())] as char);
        }
        name
    }

    /// Random attribute value (never contains the quote it is wrapped in)
    pub fn attr_value(&mut self) -> String {
        let len = self.geometric(0.8);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789 -_./<>&";
        (0..len)
            .map(|_| chars[self.rng.gen_range(0..chars.len())] as char)
            .collect()
    }

    /// Random text run with no markup or entity characters, never starting
    /// or ending with whitespace
    pub fn prose(&mut self) -> String {
        let words = 1 + self.geometric(0.6);
        let mut out = Vec::with_capacity(words);
        for _ in 0..words {
            let len = 1 + self.geometric(0.7);
            let word: String = (0..len).map(|_| self.rng.gen_range('a'..='z')).collect();
            out.push(word);
        }
        out.join(" ")
    }

    /// Random whitespace (spaces, tabs, newlines)
    pub fn whitespace(&mut self) -> String {
        let count = self.geometric(0.5);
        (0..count)
            .map(|_| match self.rng.gen_range(0..4) {
                0 => '\n',
                1 => '\t',
                _ => ' ',
            })
            .collect()
    }

    /// Random well-formed element, nested at most `depth` levels
    pub fn xml_fragment(&mut self, depth: usize) -> String {
        let name = self.name();
        let mut out = format!("<{}", name);

        let mut used = Vec::new();
        for _ in 0..self.geometric(0.4) {
            let key = self.name();
            if used.contains(&key) {
                continue;
            }
            let quote = if self.chance(0.5) { '"' } else { '\'' };
            out.push_str(&format!(" {}={}{}{}", key, quote, self.attr_value(), quote));
            used.push(key);
        }

        if depth == 0 || self.chance(0.3) {
            out.push_str("/>");
            return out;
        }

        out.push('>');
        for _ in 0..self.geometric(0.5) {
            out.push_str(&self.whitespace());
            match self.rng.gen_range(0..5) {
                0 => out.push_str(&format!("<!--{}-->", self.prose())),
                1 => out.push_str(&format!("<![CDATA[{}]]>", self.prose())),
                2 => out.push_str(&self.prose()),
                _ => out.push_str(&self.xml_fragment(depth - 1)),
            }
        }
        out.push_str(&format!("</{}>", name));
        out
    }

    /// Random document: an optional declaration and one root element
    pub fn document(&mut self, depth: usize) -> String {
        let mut out = String::new();
        if self.chance(0.5) {
            out.push_str("<?xml version=\"1.0\"?>");
            out.push_str(&self.whitespace());
        }
        out.push_str(&self.xml_fragment(depth));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.xml_fragment(3), g2.xml_fragment(3));
        }
    }

    #[test]
    fn test_geometric_distribution() {
        let mut gen = Gen::new(12345);
        let samples: Vec<usize> = (0..1000).map(|_| gen.geometric(0.9)).collect();

        // With α=0.9, we expect mean ≈ 9 (geometric mean = α/(1-α))
        let mean: f64 = samples.iter().sum::<usize>() as f64 / samples.len() as f64;
        assert!(mean > 5.0 && mean < 15.0, "Mean {} out of expected range", mean);
    }
}
