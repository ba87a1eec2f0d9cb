//! Uniform linear quantizer with saturation.
//!
//! Values are mapped onto `[0, levels - 1]`, clamped, rounded half to even
//! and re-centred so the output is a signed code in
//! `[-levels / 2, levels / 2 - 1]`.

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::utils::consts::MAX_QUANTIZATION_BITS;

/// Quantizes `value` over `[min, max]`. Requires `levels >= 2` and `max > min`.
pub fn quantize(value: f64, min: f64, max: f64, levels: u32) -> i32 {
    debug_assert!(levels >= 2, "quantizer needs at least two levels");
    debug_assert!(max > min, "quantizer range is empty");
    let top = f64::from(levels - 1);
    let normalized = ((value - min) * top / (max - min)).clamp(0.0, top);
    normalized.round_ties_even() as i32 - (levels / 2) as i32
}

/// Quantizer for I/Q samples over a symmetric `[-v_sat, v_sat]` range
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    v_sat: f64,
    bits: u32,
    levels: u32,
}

impl Quantizer {
    pub fn new(bits: u32, v_sat: f64) -> SimResult<Self> {
        if bits == 0 || bits > MAX_QUANTIZATION_BITS {
            return Err(SimError::config(format!(
                "quantization bits must be in 1..={}, got {}",
                MAX_QUANTIZATION_BITS, bits
            )));
        }
        if !(v_sat.is_finite() && v_sat > 0.0) {
            return Err(SimError::config(format!(
                "quantizer saturation level must be positive, got {}",
                v_sat
            )));
        }

        Ok(Self {
            v_sat,
            bits,
            levels: 1 << bits,
        })
    }

    pub fn quantize(&self, value: f64) -> i16 {
        quantize(value, -self.v_sat, self.v_sat, self.levels) as i16
    }

    pub fn quantize_iq(&self, sample: Complex64) -> (i16, i16) {
        (self.quantize(sample.re), self.quantize(sample.im))
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn v_sat(&self) -> f64 {
        self.v_sat
    }

    pub fn min_code(&self) -> i16 {
        -((self.levels / 2) as i32) as i16
    }

    pub fn max_code(&self) -> i16 {
        (self.levels / 2 - 1) as i16
    }
}
