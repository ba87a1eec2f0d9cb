//! Reporting sinks for intermediate pipeline signals.
//!
//! The pipeline hands every batch of every stage to a [`Reporter`]. The
//! reporter is purely an observer: nothing it does feeds back into the
//! generated samples.

use hound::{SampleFormat, WavSpec, WavWriter};
use num_complex::Complex64;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::SimResult;

/// Pipeline stage a batch was captured after. Stages that are switched off
/// are skipped, so each capture holds every enabled stage up to its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// BOC chips after Doppler resampling, before carrier rotation
    Chips,
    DopplerShifted,
    PathLoss,
    Noisy,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Chips => "boc_chips",
            Stage::DopplerShifted => "doppler_shift",
            Stage::PathLoss => "path_loss",
            Stage::Noisy => "awgn",
        }
    }
}

pub trait Reporter {
    fn report(&mut self, stage: Stage, batch: &[Complex64]) -> SimResult<()>;

    fn finish(&mut self) -> SimResult<()> {
        Ok(())
    }
}

pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _stage: Stage, _batch: &[Complex64]) -> SimResult<()> {
        Ok(())
    }
}

struct StageWriter {
    writer: WavWriter<BufWriter<File>>,
    written: usize,
}

/// Writes the first `max_samples` of each stage to `<dir>/<stage>.wav`
/// as stereo 32-bit float, I on the left channel and Q on the right.
pub struct WavReporter {
    dir: PathBuf,
    sample_rate: u32,
    max_samples: usize,
    writers: HashMap<Stage, StageWriter>,
}

impl WavReporter {
    pub fn new(dir: &Path, sample_rate: f64, max_samples: usize) -> SimResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            sample_rate: sample_rate.round() as u32,
            max_samples,
            writers: HashMap::new(),
        })
    }

    fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(format!("{}.wav", stage.name()))
    }
}

impl Reporter for WavReporter {
    fn report(&mut self, stage: Stage, batch: &[Complex64]) -> SimResult<()> {
        if !self.writers.contains_key(&stage) {
            let spec = WavSpec {
                channels: 2,
                sample_rate: self.sample_rate,
                bits_per_sample: 32,
                sample_format: SampleFormat::Float,
            };
            let writer = WavWriter::create(self.path_for(stage), spec)?;
            self.writers.insert(stage, StageWriter { writer, written: 0 });
        }
        let Some(stage_writer) = self.writers.get_mut(&stage) else {
            return Ok(());
        };

        let room = self.max_samples.saturating_sub(stage_writer.written);
        for sample in batch.iter().take(room) {
            stage_writer.writer.write_sample(sample.re as f32)?;
            stage_writer.writer.write_sample(sample.im as f32)?;
        }
        stage_writer.written += batch.len().min(room);
        Ok(())
    }

    fn finish(&mut self) -> SimResult<()> {
        for (stage, stage_writer) in self.writers.drain() {
            stage_writer.writer.finalize()?;
            info!(
                "Wrote {} {} samples to {}",
                stage_writer.written,
                stage.name(),
                self.dir.join(format!("{}.wav", stage.name())).display()
            );
        }
        Ok(())
    }
}
