//! Random sources for reveal delays.
//!
//! The scheduler only ever asks for "a value in this range", so any
//! `FnMut(Range<u64>) -> u64` works. Tests pin the result; production uses a
//! PCG generator seeded from the OS.

use std::ops::Range;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Injectable uniform sampler over `[start, end)`.
pub type Sampler = Box<dyn FnMut(Range<u64>) -> u64 + Send>;

fn sample_with(rng: &mut Mcg128Xsl64, range: Range<u64>) -> u64 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range)
    }
}

/// Non-reproducible jitter.
pub fn entropy_sampler() -> Sampler {
    let mut rng = Mcg128Xsl64::from_entropy();
    Box::new(move |range| sample_with(&mut rng, range))
}

/// Reproducible jitter for a given seed.
pub fn seeded_sampler(seed: u64) -> Sampler {
    let mut rng = Mcg128Xsl64::seed_from_u64(seed);
    Box::new(move |range| sample_with(&mut rng, range))
}

/// Always the lower bound of the range.
pub fn min_sampler() -> Sampler {
    Box::new(|range: Range<u64>| range.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sampler_is_reproducible_and_in_range() {
        let mut a = seeded_sampler(7);
        let mut b = seeded_sampler(7);
        for _ in 0..100 {
            let x = a(3000..5000);
            assert_eq!(x, b(3000..5000));
            assert!((3000..5000).contains(&x));
        }
    }

    #[test]
    fn empty_range_returns_start() {
        let mut sampler = entropy_sampler();
        assert_eq!(sampler(42..42), 42);
    }

    #[test]
    fn min_sampler_pins_lower_bound() {
        let mut sampler = min_sampler();
        assert_eq!(sampler(5000..7000), 5000);
    }
}
