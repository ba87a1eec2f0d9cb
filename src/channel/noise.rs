//! Complex additive white Gaussian noise.

use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{SimError, SimResult};

/// Complex AWGN with total power `noise_power` (N0), split evenly
/// between the I and Q components.
///
/// Owns its own `ChaCha8Rng`, seeded from the caller's generator, so the
/// noise stream is fixed once the generator is built.
pub struct NoiseGenerator {
    /// Per-component distribution, N(0, N0 / 2)
    component: Normal<f64>,
    rng: ChaCha8Rng,
}

impl NoiseGenerator {
    pub fn new<R: Rng>(noise_power: f64, seed_rng: &mut R) -> SimResult<Self> {
        if !(noise_power.is_finite() && noise_power >= 0.0) {
            return Err(SimError::config(format!(
                "noise power must be finite and non-negative, got {}",
                noise_power
            )));
        }

        let component = Normal::new(0.0, (noise_power / 2.0).sqrt())
            .map_err(|e| SimError::config(format!("noise distribution: {}", e)))?;
        Ok(Self {
            component,
            rng: ChaCha8Rng::seed_from_u64(seed_rng.random()),
        })
    }

    /// Per-component standard deviation, sqrt(N0 / 2)
    pub fn sigma(&self) -> f64 {
        self.component.std_dev()
    }

    pub fn next_sample(&mut self) -> Complex64 {
        let re = self.component.sample(&mut self.rng);
        let im = self.component.sample(&mut self.rng);
        Complex64::new(re, im)
    }

    pub fn generate(&mut self, length: usize) -> Vec<Complex64> {
        self.by_ref().take(length).collect()
    }
}

impl Iterator for NoiseGenerator {
    type Item = Complex64;

    fn next(&mut self) -> Option<Complex64> {
        Some(self.next_sample())
    }
}
