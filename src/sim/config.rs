use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::channel::db_to_linear;
use crate::error::{SimError, SimResult};
use crate::utils::consts::*;

/// Channel and signal parameters for one simulation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub doppler_update_period_s: f64,
    pub pathloss_update_period_s: f64,
    pub doppler_freq_min_hz: f64,
    pub doppler_freq_max_hz: f64,
    pub pathloss_min_db: f64,
    pub pathloss_max_db: f64,
    pub snr_db: f64,
    pub apply_pathloss: bool,
    pub apply_awgn: bool,
    pub quantization_bits: u32,
    pub chip_rate_hz: f64,
    pub sample_rate_hz: f64,
    /// Seed for every random draw; a fresh one is picked when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            doppler_update_period_s: DEFAULT_DOPPLER_UPDATE_PERIOD_S,
            pathloss_update_period_s: DEFAULT_PATHLOSS_UPDATE_PERIOD_S,
            doppler_freq_min_hz: DEFAULT_DOPPLER_FREQ_MIN_HZ,
            doppler_freq_max_hz: DEFAULT_DOPPLER_FREQ_MAX_HZ,
            pathloss_min_db: DEFAULT_PATHLOSS_MIN_DB,
            pathloss_max_db: DEFAULT_PATHLOSS_MAX_DB,
            snr_db: DEFAULT_SNR_DB,
            apply_pathloss: true,
            apply_awgn: true,
            quantization_bits: DEFAULT_QUANTIZATION_BITS,
            chip_rate_hz: DEFAULT_CHIP_RATE_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            seed: None,
        }
    }
}

fn require_positive(name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::config(format!("{} must be positive, got {}", name, value)))
    }
}

fn require_finite(name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::config(format!("{} must be finite, got {}", name, value)))
    }
}

impl SimConfig {
    pub fn from_json_file(path: &Path) -> SimResult<Self> {
        let config = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        require_positive("doppler_update_period_s", self.doppler_update_period_s)?;
        require_positive("pathloss_update_period_s", self.pathloss_update_period_s)?;
        require_positive("chip_rate_hz", self.chip_rate_hz)?;
        require_positive("sample_rate_hz", self.sample_rate_hz)?;
        require_finite("doppler_freq_min_hz", self.doppler_freq_min_hz)?;
        require_finite("doppler_freq_max_hz", self.doppler_freq_max_hz)?;
        require_finite("pathloss_min_db", self.pathloss_min_db)?;
        require_finite("pathloss_max_db", self.pathloss_max_db)?;
        require_finite("snr_db", self.snr_db)?;

        if self.doppler_freq_max_hz < self.doppler_freq_min_hz {
            return Err(SimError::config(format!(
                "doppler_freq_max_hz ({}) is below doppler_freq_min_hz ({})",
                self.doppler_freq_max_hz, self.doppler_freq_min_hz
            )));
        }
        if self.pathloss_max_db < self.pathloss_min_db {
            return Err(SimError::config(format!(
                "pathloss_max_db ({}) is below pathloss_min_db ({})",
                self.pathloss_max_db, self.pathloss_min_db
            )));
        }
        if self.quantization_bits == 0 || self.quantization_bits > MAX_QUANTIZATION_BITS {
            return Err(SimError::config(format!(
                "quantization_bits must be in 1..={}, got {}",
                MAX_QUANTIZATION_BITS, self.quantization_bits
            )));
        }
        if self.slowest_chip_rate_hz() <= 0.0 {
            return Err(SimError::config(format!(
                "doppler_freq_min_hz ({}) stops the chip clock at chip rate {}",
                self.doppler_freq_min_hz, self.chip_rate_hz
            )));
        }
        if (self.doppler_update_period_s * self.sample_rate_hz).round() < 1.0 {
            return Err(SimError::config(
                "doppler_update_period_s is shorter than one output sample",
            ));
        }
        if (self.pathloss_update_period_s * self.sample_rate_hz).round() < 1.0 {
            return Err(SimError::config(
                "pathloss_update_period_s is shorter than one output sample",
            ));
        }
        let derived = [
            ("saturation level", self.v_sat()),
            ("noise power", self.noise_power()),
        ];
        for (name, value) in derived {
            if !value.is_finite() {
                return Err(SimError::config(format!("{} is not finite", name)));
            }
        }
        Ok(())
    }

    /// BOC(1,1) chip rate under the lowest Doppler shift.
    pub fn slowest_chip_rate_hz(&self) -> f64 {
        2.0 * self.chip_rate_hz + self.doppler_freq_min_hz
    }

    pub fn pathloss_gain_range(&self) -> (f64, f64) {
        (db_to_linear(self.pathloss_min_db), db_to_linear(self.pathloss_max_db))
    }

    /// Quantizer full scale: the amplitude of the strongest path loss gain.
    pub fn v_sat(&self) -> f64 {
        db_to_linear(self.pathloss_max_db).sqrt()
    }

    /// N0 relative to the gain at the centre of the path loss range.
    pub fn noise_power(&self) -> f64 {
        let mean_gain = db_to_linear((self.pathloss_min_db + self.pathloss_max_db) / 2.0);
        mean_gain / db_to_linear(self.snr_db)
    }

    /// Real-time duration covering `chips` at the slowest chip rate.
    pub fn max_signal_duration_s(&self, chips: usize) -> f64 {
        chips as f64 / self.slowest_chip_rate_hz()
    }
}
