//! Injectable randomness for the stress forecast
//!
//! Production forecasts draw uniform noise from an entropy-seeded PCG
//! generator. Tests and reproducible reports use a fixed seed, a constant
//! offset, or no noise at all.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Largest absolute noise a source may produce
pub const MAX_NOISE_AMPLITUDE: f64 = 1.0;

/// Source of per-day forecast noise in `[-1, 1]`
pub trait NoiseSource {
    /// Draw the next noise value
    fn sample(&mut self) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

/// Uniform noise from any random number generator
#[derive(Debug, Clone)]
pub struct RngNoise<R> {
    rng: R,
    amplitude: f64,
}

impl<R: Rng> RngNoise<R> {
    /// Wrap a generator; amplitude is clamped to `[0, 1]`
    pub fn new(rng: R, amplitude: f64) -> Self {
        let amplitude = if amplitude.is_nan() {
            0.0
        } else {
            amplitude.clamp(0.0, MAX_NOISE_AMPLITUDE)
        };
        Self { rng, amplitude }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

impl RngNoise<Pcg64> {
    /// Full-amplitude noise seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::from_entropy_with_amplitude(MAX_NOISE_AMPLITUDE)
    }

    /// Entropy-seeded noise with a custom amplitude
    pub fn from_entropy_with_amplitude(amplitude: f64) -> Self {
        Self::new(Pcg64::from_entropy(), amplitude)
    }

    /// Full-amplitude noise with a reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg64::seed_from_u64(seed), MAX_NOISE_AMPLITUDE)
    }

    /// Reproducible noise with a custom amplitude
    pub fn seeded_with_amplitude(seed: u64, amplitude: f64) -> Self {
        Self::new(Pcg64::seed_from_u64(seed), amplitude)
    }
}

impl<R: Rng> NoiseSource for RngNoise<R> {
    fn sample(&mut self) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

/// No noise: forecasts follow the trend exactly
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

/// The same offset every day
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(f64);

impl FixedNoise {
    /// Offset is clamped to `[-1, 1]`
    pub fn new(offset: f64) -> Self {
        if offset.is_nan() {
            return Self(0.0);
        }
        Self(offset.clamp(-MAX_NOISE_AMPLITUDE, MAX_NOISE_AMPLITUDE))
    }
}

impl NoiseSource for FixedNoise {
    fn sample(&mut self) -> f64 {
        self.0
    }
}
