//! Piecewise-constant path loss profile.

use rand::Rng;
use tracing::debug;

use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLossSegment {
    pub gain_linear: f64,
    pub sample_count: usize,
}

/// Power gains, one window per update period, covering an exact sample count.
#[derive(Debug, Clone)]
pub struct PathLossProfile {
    segments: Vec<PathLossSegment>,
}

impl PathLossProfile {
    /// Draws a new gain from `[gain_min, gain_max]` every
    /// `update_period_s * sample_rate` samples until `total_samples` are covered.
    /// Gains are linear power ratios.
    pub fn generate<R: Rng>(
        total_samples: usize,
        update_period_s: f64,
        gain_min: f64,
        gain_max: f64,
        sample_rate: f64,
        rng: &mut R,
    ) -> SimResult<Self> {
        if !(gain_min.is_finite() && gain_max.is_finite()) {
            return Err(SimError::config("path loss gain range must be finite"));
        }
        if gain_max < gain_min {
            return Err(SimError::config(format!(
                "path loss max gain {} is below min gain {}",
                gain_max, gain_min
            )));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SimError::config(format!("sample rate must be positive, got {}", sample_rate)));
        }
        let window = (update_period_s * sample_rate).round();
        if !(window.is_finite() && window >= 1.0) {
            return Err(SimError::config(format!(
                "path loss update period {} s is shorter than one sample",
                update_period_s
            )));
        }
        let window = window as usize;

        let mut segments = Vec::with_capacity(total_samples.div_ceil(window));
        let mut covered = 0usize;
        while covered < total_samples {
            let sample_count = window.min(total_samples - covered);
            let gain_linear = rng.random_range(gain_min..=gain_max);
            debug!(
                "Path loss window at sample {}: gain {:.6} for {} samples",
                covered, gain_linear, sample_count
            );
            segments.push(PathLossSegment {
                gain_linear,
                sample_count,
            });
            covered += sample_count;
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathLossSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.sample_count)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean gain over the covered samples.
    pub fn mean_gain(&self) -> Option<f64> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let weighted: f64 = self
            .segments
            .iter()
            .map(|s| s.gain_linear * s.sample_count as f64)
            .sum();
        Some(weighted / len as f64)
    }

    /// Flat per-sample gain sequence.
    pub fn gains(&self) -> impl Iterator<Item = f64> + '_ {
        self.segments
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.gain_linear, s.sample_count))
    }
}
