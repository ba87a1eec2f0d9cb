//! Doppler shift model.
//!
//! The transmission is cut into fixed real-time segments. Each segment gets
//! a Doppler frequency drawn uniformly from the configured range, and its
//! phase offset is chosen so the carrier rotation is continuous across
//! segment boundaries.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

use crate::channel::samples_covering;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DopplerSegment {
    pub frequency_hz: f64,
    pub phase_offset: f64,
    pub start_time_s: f64,
    pub duration_s: f64,
}

impl DopplerSegment {
    /// Carrier phase `t` seconds into the segment (local time origin).
    pub fn phase_at(&self, t: f64) -> f64 {
        2.0 * PI * self.frequency_hz * t + self.phase_offset
    }

    pub fn end_phase(&self) -> f64 {
        self.phase_at(self.duration_s)
    }
}

/// Ordered Doppler segments covering a whole transmission
#[derive(Debug, Clone)]
pub struct DopplerProfile {
    segments: Vec<DopplerSegment>,
    update_period_s: f64,
}

impl DopplerProfile {
    pub fn generate<R: Rng>(
        total_duration_s: f64,
        update_period_s: f64,
        freq_min_hz: f64,
        freq_max_hz: f64,
        rng: &mut R,
    ) -> SimResult<Self> {
        if !(update_period_s.is_finite() && update_period_s > 0.0) {
            return Err(SimError::config(format!(
                "Doppler update period must be positive, got {}",
                update_period_s
            )));
        }
        if !(total_duration_s.is_finite() && total_duration_s >= 0.0) {
            return Err(SimError::config(format!(
                "signal duration must be finite and non-negative, got {}",
                total_duration_s
            )));
        }
        if !(freq_min_hz.is_finite() && freq_max_hz.is_finite()) {
            return Err(SimError::config("Doppler frequency range must be finite"));
        }
        if freq_max_hz < freq_min_hz {
            return Err(SimError::config(format!(
                "Doppler max frequency {} Hz is below min frequency {} Hz",
                freq_max_hz, freq_min_hz
            )));
        }

        let count = ((total_duration_s / update_period_s).ceil() as usize).max(1);
        let mut segments: Vec<DopplerSegment> = Vec::with_capacity(count);

        for i in 0..count {
            let start_time_s = i as f64 * update_period_s;
            let duration_s = if i + 1 == count {
                (total_duration_s - start_time_s).max(0.0).min(update_period_s)
            } else {
                update_period_s
            };
            let phase_offset = segments
                .last()
                .map_or(0.0, DopplerSegment::end_phase);
            let frequency_hz = rng.random_range(freq_min_hz..=freq_max_hz);

            debug!(
                "Doppler segment {}: {:.1} Hz from {:.4} s",
                i, frequency_hz, start_time_s
            );

            segments.push(DopplerSegment {
                frequency_hz,
                phase_offset,
                start_time_s,
                duration_s,
            });
        }

        Ok(Self {
            segments,
            update_period_s,
        })
    }

    pub fn segments(&self) -> &[DopplerSegment] {
        &self.segments
    }

    pub fn update_period_s(&self) -> f64 {
        self.update_period_s
    }

    /// Segment active at elapsed real time `t`, clamped to the last one.
    pub fn segment_at(&self, t: f64) -> &DopplerSegment {
        let index = (t / self.update_period_s).floor().max(0.0) as usize;
        &self.segments[index.min(self.segments.len() - 1)]
    }

    pub fn total_duration_s(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.duration_s)
            .sum()
    }

    /// Continuous-phase carrier `exp(j(2π f t + φ))` sampled at `sample_rate`.
    pub fn carrier_wave(&self, sample_rate: f64) -> CarrierWave<'_> {
        CarrierWave {
            segments: &self.segments,
            sample_rate,
            segment: 0,
            sample: 0,
        }
    }

    /// Number of samples `carrier_wave` yields.
    pub fn carrier_len(&self, sample_rate: f64) -> usize {
        self.segments
            .iter()
            .map(|s| samples_covering(s.duration_s, sample_rate))
            .sum()
    }
}

/// Lazy carrier wave over a Doppler profile; time restarts at zero in every
/// segment while the segment phase offset carries continuity.
pub struct CarrierWave<'a> {
    segments: &'a [DopplerSegment],
    sample_rate: f64,
    segment: usize,
    sample: usize,
}

impl Iterator for CarrierWave<'_> {
    type Item = Complex64;

    fn next(&mut self) -> Option<Complex64> {
        loop {
            let segment = self.segments.get(self.segment)?;
            if self.sample < samples_covering(segment.duration_s, self.sample_rate) {
                let t = self.sample as f64 / self.sample_rate;
                self.sample += 1;
                return Some(Complex64::from_polar(1.0, segment.phase_at(t)));
            }
            self.segment += 1;
            self.sample = 0;
        }
    }
}
