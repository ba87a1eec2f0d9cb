//! Doppler-driven zero-order-hold resampler.
//!
//! Each chip lasts `1 / (2 * chip_rate + f_d)` seconds, where `f_d` is the
//! Doppler frequency of the segment active when the chip starts. That
//! duration is converted to a fractional number of output samples and
//! added to a remainder; the chip is repeated once per whole sample the
//! remainder crosses, and the fraction carries into the next chip.

use crate::channel::DopplerProfile;
use crate::error::{SimError, SimResult};

/// Resampling state machine: the carried fractional remainder and the
/// elapsed real time used to pick the active Doppler segment.
#[derive(Debug, Clone)]
pub struct ChipResampler<'p> {
    profile: &'p DopplerProfile,
    chip_rate: f64,
    sample_rate: f64,
    remainder: f64,
    elapsed_s: f64,
}

impl<'p> ChipResampler<'p> {
    pub fn new(profile: &'p DopplerProfile, chip_rate: f64, sample_rate: f64) -> SimResult<Self> {
        if !(chip_rate.is_finite() && chip_rate > 0.0) {
            return Err(SimError::config(format!("chip rate must be positive, got {}", chip_rate)));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SimError::config(format!("sample rate must be positive, got {}", sample_rate)));
        }
        if (profile.update_period_s() * sample_rate).round() < 1.0 {
            return Err(SimError::config(format!(
                "Doppler update period {} s is shorter than one sample at {} Hz",
                profile.update_period_s(),
                sample_rate
            )));
        }
        let slowest = profile
            .segments()
            .iter()
            .map(|s| 2.0 * chip_rate + s.frequency_hz)
            .fold(f64::INFINITY, f64::min);
        if slowest <= 0.0 {
            return Err(SimError::config(format!(
                "Doppler shift drives the effective chip rate to {} Hz",
                slowest
            )));
        }

        Ok(Self {
            profile,
            chip_rate,
            sample_rate,
            remainder: 0.0,
            elapsed_s: 0.0,
        })
    }

    /// Advances by one chip and returns how many output samples it spans.
    pub fn step(&mut self) -> usize {
        let segment = self.profile.segment_at(self.elapsed_s);
        let effective_rate = 2.0 * self.chip_rate + segment.frequency_hz;

        self.elapsed_s += 1.0 / effective_rate;
        self.remainder += self.sample_rate / effective_rate;

        let whole = self.remainder.trunc();
        self.remainder -= whole;
        whole as usize
    }

    /// Fractional output-sample debt, always in `[0, 1)`.
    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn resample<I>(self, chips: I) -> Resampled<'p, I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Resampled {
            resampler: self,
            chips: chips.into_iter(),
            current: 0.0,
            pending: 0,
        }
    }
}

/// Flat output sample stream produced by repeating each chip value.
/// Ends as soon as the chip stream is exhausted.
pub struct Resampled<'p, I> {
    resampler: ChipResampler<'p>,
    chips: I,
    current: f64,
    pending: usize,
}

impl<'p, I> Resampled<'p, I> {
    pub fn resampler(&self) -> &ChipResampler<'p> {
        &self.resampler
    }
}

impl<I> Iterator for Resampled<'_, I>
where
    I: Iterator<Item = f64>,
{
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        while self.pending == 0 {
            self.current = self.chips.next()?;
            self.pending = self.resampler.step();
        }
        self.pending -= 1;
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const CHIP_RATE: f64 = 1.023e6;
    const SAMPLE_RATE: f64 = 4.092e6;

    fn profile(duration: f64, f_min: f64, f_max: f64) -> DopplerProfile {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        DopplerProfile::generate(duration, 0.2, f_min, f_max, &mut rng).unwrap()
    }

    #[test]
    fn test_remainder_stays_in_unit_interval() {
        let profile = profile(1.0, 2000.0, 5000.0);
        let mut resampler = ChipResampler::new(&profile, CHIP_RATE, SAMPLE_RATE).unwrap();

        for _ in 0..200_000 {
            resampler.step();
            let r = resampler.remainder();
            assert!((0.0..1.0).contains(&r), "remainder {} out of range", r);
        }
    }

    #[test]
    fn test_zero_doppler_matches_nominal_count() {
        let profile = profile(1.0, 0.0, 0.0);
        let prn_length = 1023;
        let bits = 25;
        let chips = 2 * prn_length * bits;

        let resampler = ChipResampler::new(&profile, CHIP_RATE, SAMPLE_RATE).unwrap();
        let produced = resampler.resample(std::iter::repeat_n(1.0, chips)).count();

        let nominal = (chips as f64 * SAMPLE_RATE / (2.0 * CHIP_RATE)).round() as i64;
        assert!((produced as i64 - nominal).abs() <= 1, "{} vs {}", produced, nominal);
    }

    #[test]
    fn test_non_integer_ratio_count() {
        let profile = profile(1.0, 0.0, 0.0);
        // 3 output samples per 2 chips
        let resampler = ChipResampler::new(&profile, 1000.0, 3000.0).unwrap();
        let produced = resampler.resample(std::iter::repeat_n(1.0, 1000)).count();
        assert!((produced as i64 - 1500).abs() <= 1);
    }

    #[test]
    fn test_unity_rate_passes_chips_through() {
        let profile = profile(1.0, 0.0, 0.0);
        let chips = [1.0, 1.0, -1.0, -1.0, -1.0, 1.0];
        let resampler = ChipResampler::new(&profile, 500.0, 1000.0).unwrap();
        let out: Vec<f64> = resampler.resample(chips).collect();
        assert_eq!(out, chips);
    }

    #[test]
    fn test_positive_doppler_shortens_output() {
        let chips = 2 * 1023 * 20;
        let still = profile(1.0, 0.0, 0.0);
        let moving = profile(1.0, 4000.0, 5000.0);

        let n_still = ChipResampler::new(&still, CHIP_RATE, SAMPLE_RATE)
            .unwrap()
            .resample(std::iter::repeat_n(1.0, chips))
            .count();
        let n_moving = ChipResampler::new(&moving, CHIP_RATE, SAMPLE_RATE)
            .unwrap()
            .resample(std::iter::repeat_n(1.0, chips))
            .count();

        assert!(n_moving < n_still);
    }

    #[test]
    fn test_stops_when_chips_run_out() {
        let profile = profile(10.0, 0.0, 0.0);
        let resampler = ChipResampler::new(&profile, CHIP_RATE, SAMPLE_RATE).unwrap();
        assert_eq!(resampler.resample(std::iter::empty()).count(), 0);
    }

    #[test]
    fn test_sub_sample_doppler_period_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let profile = DopplerProfile::generate(1e-6, 1e-9, 0.0, 0.0, &mut rng).unwrap();
        let result = ChipResampler::new(&profile, CHIP_RATE, SAMPLE_RATE);
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_non_positive_effective_rate_rejected() {
        let profile = profile(1.0, -3000.0, -2500.0);
        assert!(ChipResampler::new(&profile, 1000.0, 4000.0).is_err());
        assert!(ChipResampler::new(&profile, 0.0, 4000.0).is_err());
    }
}
