pub mod doppler;
pub mod noise;
pub mod path_loss;
pub mod resampler;

pub use doppler::{CarrierWave, DopplerProfile, DopplerSegment};
pub use noise::NoiseGenerator;
pub use path_loss::{PathLossProfile, PathLossSegment};
pub use resampler::{ChipResampler, Resampled};

/// Converts a power ratio in dB to linear scale.
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Number of output samples needed to cover `duration_s` at `sample_rate`.
pub fn samples_covering(duration_s: f64, sample_rate: f64) -> usize {
    (duration_s * sample_rate).ceil().max(0.0) as usize
}
