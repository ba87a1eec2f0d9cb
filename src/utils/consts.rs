/// Log level (can be overridden by RUST_LOG)
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Signal Parameters
// ============================================================================

/// Nominal PRN chip rate (Hz)
pub const DEFAULT_CHIP_RATE_HZ: f64 = 1.023e6;

/// Output sampling frequency (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 4.092e6;

/// Bits per I or Q component in the output file
pub const DEFAULT_QUANTIZATION_BITS: u32 = 16;

/// Widest code the 2-byte output format can carry
pub const MAX_QUANTIZATION_BITS: u32 = 16;

// ============================================================================
// Channel Parameters
// ============================================================================

/// Doppler shift update period (s)
pub const DEFAULT_DOPPLER_UPDATE_PERIOD_S: f64 = 0.2;

/// Path loss update period (s)
pub const DEFAULT_PATHLOSS_UPDATE_PERIOD_S: f64 = 0.1995;

pub const DEFAULT_DOPPLER_FREQ_MIN_HZ: f64 = 2000.0;
pub const DEFAULT_DOPPLER_FREQ_MAX_HZ: f64 = 5000.0;

pub const DEFAULT_PATHLOSS_MIN_DB: f64 = -25.0;
pub const DEFAULT_PATHLOSS_MAX_DB: f64 = -20.0;

pub const DEFAULT_SNR_DB: f64 = 20.0;

// ============================================================================
// Pipeline
// ============================================================================

/// Complex samples carried through the channel stages per batch
pub const BATCH_SIZE: usize = 8192;

/// Samples kept per stage by the WAV reporter
pub const REPORT_MAX_SAMPLES: usize = 1 << 20;

/// Progress update interval (ms)
pub const PROGRESS_UPDATE_INTERVAL_MS: u64 = 100;

// ============================================================================
// Files
// ============================================================================

pub const DEFAULT_CODES_PATH: &str = "codes.json";
pub const DEFAULT_MESSAGE_PATH: &str = "message.bin";
pub const DEFAULT_OUTPUT_PATH: &str = "output.bin";
