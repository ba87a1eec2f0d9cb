//! Channel simulation pipeline.
//!
//! bits -> BOC(1,1) chips -> Doppler resampling -> carrier rotation
//! -> path loss -> AWGN -> quantizer -> sink
//!
//! All random draws happen while planning a run, in a fixed order (Doppler
//! frequencies, path loss gains, noise seed), so one seed reproduces the
//! whole output. Execution streams fixed-size batches through the stages;
//! every stage truncates the batch to the shortest of its inputs.

use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::Cell;
use tracing::{debug, info};

use crate::channel::{
    ChipResampler, DopplerProfile, NoiseGenerator, PathLossProfile, samples_covering,
};
use crate::error::SimResult;
use crate::io::Bit;
use crate::quant::{Quantizer, SampleSink};
use crate::sim::SimConfig;
use crate::sim::report::{Reporter, Stage};
use crate::spread::{ChipTable, spread};
use crate::utils::consts::BATCH_SIZE;

/// Random channel realisation for one run
pub struct ChannelPlan {
    pub bit_count: usize,
    pub chip_count: usize,
    /// Upper bound on the real-time length of the transmission
    pub duration_s: f64,
    pub total_samples: usize,
    pub doppler: DopplerProfile,
    pub path_loss: PathLossProfile,
    pub noise: NoiseGenerator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub bits: usize,
    pub chips: usize,
    /// Samples pulled from the resampler
    pub resampled_samples: usize,
    /// Samples handed to the sink after truncation
    pub output_samples: usize,
    /// Real time spanned by the consumed chips
    pub signal_duration_s: f64,
}

pub struct Pipeline {
    config: SimConfig,
    table: ChipTable,
    quantizer: Quantizer,
}

impl Pipeline {
    pub fn new(config: SimConfig, table: ChipTable) -> SimResult<Self> {
        config.validate()?;
        let quantizer = Quantizer::new(config.quantization_bits, config.v_sat())?;

        Ok(Self {
            config,
            table,
            quantizer,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn table(&self) -> &ChipTable {
        &self.table
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Draws the Doppler segments, path loss windows and noise seed for a
    /// message of `bit_count` bits.
    pub fn plan<R: Rng>(&self, bit_count: usize, rng: &mut R) -> SimResult<ChannelPlan> {
        let config = &self.config;
        let chip_count = bit_count * self.table.boc_length();
        let duration_s = config.max_signal_duration_s(chip_count);
        let total_samples = samples_covering(duration_s, config.sample_rate_hz);

        let doppler = DopplerProfile::generate(
            duration_s,
            config.doppler_update_period_s,
            config.doppler_freq_min_hz,
            config.doppler_freq_max_hz,
            rng,
        )?;

        let (gain_min, gain_max) = config.pathloss_gain_range();
        let path_loss = PathLossProfile::generate(
            total_samples,
            config.pathloss_update_period_s,
            gain_min,
            gain_max,
            config.sample_rate_hz,
            rng,
        )?;

        let noise = NoiseGenerator::new(config.noise_power(), rng)?;

        info!(
            "Planned {} bits -> {} chips, up to {:.3} s ({} samples)",
            bit_count, chip_count, duration_s, total_samples
        );
        info!(
            "{} Doppler segments, {} path loss windows (mean gain {:.3e}), N0 = {:.3e}",
            doppler.segments().len(),
            path_loss.segments().len(),
            path_loss.mean_gain().unwrap_or(0.0),
            config.noise_power()
        );

        Ok(ChannelPlan {
            bit_count,
            chip_count,
            duration_s,
            total_samples,
            doppler,
            path_loss,
            noise,
        })
    }

    /// Streams `bits` through the channel described by `plan`.
    pub fn execute<I, S, P>(
        &self,
        plan: ChannelPlan,
        bits: I,
        sink: &mut S,
        reporter: &mut P,
    ) -> SimResult<RunSummary>
    where
        I: IntoIterator<Item = Bit>,
        S: SampleSink + ?Sized,
        P: Reporter + ?Sized,
    {
        let config = &self.config;
        let ChannelPlan {
            doppler,
            path_loss,
            mut noise,
            ..
        } = plan;

        let consumed = Cell::new(0usize);
        let bits = bits
            .into_iter()
            .inspect(|_| consumed.set(consumed.get() + 1));

        let resampler = ChipResampler::new(&doppler, config.chip_rate_hz, config.sample_rate_hz)?;
        let mut samples = resampler.resample(spread(&self.table, bits).chips());
        let mut carrier = doppler.carrier_wave(config.sample_rate_hz);
        let mut gains = path_loss.gains();

        let mut batch: Vec<Complex64> = Vec::with_capacity(BATCH_SIZE);
        let mut resampled_samples = 0usize;
        let mut output_samples = 0usize;

        loop {
            batch.clear();
            batch.extend(
                samples
                    .by_ref()
                    .take(BATCH_SIZE)
                    .map(|chip| Complex64::new(chip, 0.0)),
            );
            if batch.is_empty() {
                break;
            }
            let pulled = batch.len();
            resampled_samples += pulled;
            reporter.report(Stage::Chips, &batch)?;

            apply_zip(&mut batch, &mut carrier, |s, c| *s *= c);
            reporter.report(Stage::DopplerShifted, &batch)?;

            if config.apply_pathloss {
                apply_zip(&mut batch, &mut gains, |s, g| *s *= g.sqrt());
                reporter.report(Stage::PathLoss, &batch)?;
            }

            if config.apply_awgn {
                apply_zip(&mut batch, &mut noise, |s, n| *s += n);
                reporter.report(Stage::Noisy, &batch)?;
            }

            for sample in &batch {
                let (i, q) = self.quantizer.quantize_iq(*sample);
                sink.write_sample(i, q)?;
            }
            output_samples += batch.len();

            if batch.len() < pulled {
                debug!(
                    "Channel profile exhausted after {} samples",
                    output_samples
                );
                break;
            }
        }

        let signal_duration_s = samples.resampler().elapsed_s();
        drop(samples);

        sink.flush()?;
        reporter.finish()?;

        let bits = consumed.get();
        let summary = RunSummary {
            bits,
            chips: bits * self.table.boc_length(),
            resampled_samples,
            output_samples,
            signal_duration_s,
        };
        info!(
            "Generated {} samples ({:.3} s of signal) from {} bits",
            summary.output_samples, summary.signal_duration_s, summary.bits
        );
        Ok(summary)
    }

    pub fn run<I, R, S, P>(
        &self,
        bits: I,
        rng: &mut R,
        sink: &mut S,
        reporter: &mut P,
    ) -> SimResult<RunSummary>
    where
        I: ExactSizeIterator<Item = Bit>,
        R: Rng,
        S: SampleSink + ?Sized,
        P: Reporter + ?Sized,
    {
        let plan = self.plan(bits.len(), rng)?;
        self.execute(plan, bits, sink, reporter)
    }

    /// Random source for planning: the configured seed, or a fresh one that
    /// is logged so the run can be replayed.
    pub fn seeded_rng(&self) -> ChaCha8Rng {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        info!("Random seed: {}", seed);
        ChaCha8Rng::seed_from_u64(seed)
    }
}

/// Combines each sample with the next item of `other`, truncating the batch
/// if `other` runs out.
fn apply_zip<T>(
    batch: &mut Vec<Complex64>,
    other: &mut impl Iterator<Item = T>,
    mut op: impl FnMut(&mut Complex64, T),
) {
    let mut kept = 0;
    for (sample, value) in batch.iter_mut().zip(other.by_ref()) {
        op(sample, value);
        kept += 1;
    }
    batch.truncate(kept);
}
